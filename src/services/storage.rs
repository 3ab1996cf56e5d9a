//! Uploaded images stored on local disk and served under `/uploads`.

use std::fs;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use uuid::Uuid;

use crate::domain::types::ImageUrl;
use crate::services::{ServiceError, ServiceResult};

/// Public path prefix the upload directory is mounted at.
pub const UPLOADS_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Lower-cased extension of `file_name` when it is an accepted image type.
pub fn image_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[derive(Clone, Debug)]
pub struct FileStorage {
    upload_dir: PathBuf,
}

impl FileStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Copies `source` into the upload directory under a random name.
    pub fn store_image(&self, original_name: &str, source: &Path) -> ServiceResult<ImageUrl> {
        let ext = image_extension(original_name).ok_or_else(|| {
            ServiceError::Form(format!(
                "Formato de imagem não suportado: {original_name}. Use jpg, png, webp ou gif."
            ))
        })?;

        fs::create_dir_all(&self.upload_dir).map_err(|err| {
            log::error!(
                "Failed to create upload dir {}: {err}",
                self.upload_dir.display()
            );
            ServiceError::Internal(err.to_string())
        })?;

        let file_name = format!("{}.{ext}", Uuid::new_v4().simple());
        let destination = self.upload_dir.join(&file_name);
        fs::copy(source, &destination).map_err(|err| {
            log::error!("Failed to store upload {}: {err}", destination.display());
            ServiceError::Internal(err.to_string())
        })?;

        Ok(ImageUrl::new(format!("{UPLOADS_PREFIX}/{file_name}"))?)
    }

    /// Stores a multipart upload, rejecting files sent without a name.
    pub fn store_upload(&self, upload: &TempFile) -> ServiceResult<ImageUrl> {
        let name = upload
            .file_name
            .as_deref()
            .ok_or_else(|| ServiceError::Form("Arquivo sem nome.".to_string()))?;
        self.store_image(name, upload.file.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_image_extensions() {
        assert_eq!(image_extension("foto.JPG").as_deref(), Some("jpg"));
        assert_eq!(image_extension("a.b.webp").as_deref(), Some("webp"));
        assert_eq!(image_extension("script.php"), None);
        assert_eq!(image_extension("semextensao"), None);
    }

    #[test]
    fn stores_copy_under_random_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("original.png");
        fs::write(&source, b"png-bytes").unwrap();
        let storage = FileStorage::new(dir.path().join("uploads"));

        let url = storage.store_image("Foto Perfil.PNG", &source).unwrap();

        let name = url.as_str().strip_prefix("/uploads/").unwrap();
        assert!(name.ends_with(".png"));
        assert_ne!(name, "Foto Perfil.PNG");
        let stored = fs::read(storage.upload_dir().join(name)).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[test]
    fn rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.svg");
        fs::write(&source, b"<svg/>").unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.store_image("x.svg", &source),
            Err(ServiceError::Form(_))
        ));
    }
}
