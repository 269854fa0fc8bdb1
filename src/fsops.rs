use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;

/// Result of validating a destination path. Always a structured answer,
/// never an error: filesystem problems become `valid: false` with a message.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PathCheck {
    pub valid: bool,
    pub message: String,
}

impl PathCheck {
    fn ok(message: &str) -> Self {
        Self {
            valid: true,
            message: message.to_string(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Check whether `path` is a usable directory, creating it (with ancestors)
/// when it does not exist yet.
pub fn check_path(path: &str) -> PathCheck {
    if path.is_empty() {
        return PathCheck::invalid("Ruta no especificada");
    }

    let p = Path::new(path);
    if p.exists() {
        if p.is_dir() {
            PathCheck::ok("Carpeta encontrada")
        } else {
            PathCheck::invalid("La ruta especificada es un archivo, no una carpeta")
        }
    } else {
        match fs::create_dir_all(p) {
            Ok(()) => PathCheck::ok("Carpeta creada exitosamente"),
            Err(e) => {
                log::warn!("[PATH] Failed to create {}: {}", path, e);
                PathCheck::invalid("No se pudo crear la carpeta. Verifique los permisos.")
            }
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FolderListing {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FolderListing {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            folders: None,
            path: None,
            message: Some(message.into()),
        }
    }
}

fn is_hidden_or_system(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('$')
}

/// List the visible subdirectories of `path`, sorted lexicographically.
/// Hidden (`.`-prefixed) and system (`$`-prefixed) entries are skipped,
/// as are plain files.
pub fn list_folders(path: &str) -> FolderListing {
    if path.is_empty() {
        return FolderListing::failure("Ruta no especificada");
    }

    let p = Path::new(path);
    if !p.exists() {
        return FolderListing::failure("La ruta no existe");
    }
    if !p.is_dir() {
        return FolderListing::failure("La ruta especificada no es un directorio");
    }

    let entries = match fs::read_dir(p) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return FolderListing::failure("Sin permisos para acceder a esta carpeta");
        }
        Err(e) => {
            return FolderListing::failure(format!("Error al leer el directorio: {}", e));
        }
    };

    let mut folders = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return FolderListing::failure("Sin permisos para acceder a esta carpeta");
            }
            Err(e) => {
                return FolderListing::failure(format!("Error al leer el directorio: {}", e));
            }
        };

        // `is_dir` on the full path follows symlinks, so a link to a
        // directory counts as a folder.
        if !entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if is_hidden_or_system(&name) {
            continue;
        }
        folders.push(name);
    }

    folders.sort();

    FolderListing {
        success: true,
        folders: Some(folders),
        path: Some(path.to_string()),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_path_empty_is_invalid() {
        let result = check_path("");
        assert!(!result.valid);
        assert_eq!(result.message, "Ruta no especificada");
    }

    #[test]
    fn check_path_existing_directory_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_path(dir.path().to_str().unwrap());
        assert!(result.valid);
        assert_eq!(result.message, "Carpeta encontrada");
    }

    #[test]
    fn check_path_file_is_not_a_folder() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("archivo.txt");
        fs::write(&file, b"x").unwrap();

        let result = check_path(file.to_str().unwrap());
        assert!(!result.valid);
        assert_eq!(
            result.message,
            "La ruta especificada es un archivo, no una carpeta"
        );
    }

    #[test]
    fn check_path_creates_missing_directory_with_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nueva").join("carpeta");

        let result = check_path(nested.to_str().unwrap());
        assert!(result.valid);
        assert_eq!(result.message, "Carpeta creada exitosamente");
        assert!(nested.is_dir());
    }

    #[test]
    fn list_folders_empty_path_fails() {
        let result = list_folders("");
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("Ruta no especificada"));
    }

    #[test]
    fn list_folders_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-existe");
        let result = list_folders(missing.to_str().unwrap());
        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some("La ruta no existe"));
    }

    #[test]
    fn list_folders_on_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("archivo.txt");
        fs::write(&file, b"x").unwrap();

        let result = list_folders(file.to_str().unwrap());
        assert!(!result.success);
        assert_eq!(
            result.message.as_deref(),
            Some("La ruta especificada no es un directorio")
        );
    }

    #[test]
    fn list_folders_skips_hidden_system_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir(dir.path().join("$Recycle")).unwrap();
        fs::write(dir.path().join("file.txt"), b"x").unwrap();

        let path = dir.path().to_str().unwrap();
        let result = list_folders(path);
        assert!(result.success);
        assert_eq!(
            result.folders,
            Some(vec!["alpha".to_string(), "beta".to_string()])
        );
        assert_eq!(result.path.as_deref(), Some(path));
        assert!(result.message.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn list_folders_follows_directory_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("enlace")).unwrap();
        // A dangling link is not a directory and must stay out.
        std::os::unix::fs::symlink(dir.path().join("no-existe"), dir.path().join("roto"))
            .unwrap();

        let result = list_folders(dir.path().to_str().unwrap());
        assert!(result.success);
        assert_eq!(
            result.folders,
            Some(vec!["enlace".to_string(), "real".to_string()])
        );
    }

    #[test]
    fn folder_listing_serializes_without_null_fields() {
        let json = serde_json::to_value(FolderListing::failure("La ruta no existe")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("folders").is_none());
        assert!(json.get("path").is_none());
    }
}
