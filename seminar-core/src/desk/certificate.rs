use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::Desk;
use crate::error::{DeskError, DeskResult};
use crate::id::RecordId;
use crate::model::Seminar;
use crate::notice::Notifier;
use crate::remote::Transport;

impl<T: Transport, N: Notifier> Desk<T, N> {
    /// Store a certificate template inline on the local seminar record as a
    /// data URI. Nothing is sent to the backend.
    pub async fn upload_certificate_template(
        &self,
        seminar_id: &RecordId,
        file: &Path,
    ) -> DeskResult<Seminar> {
        let bytes = tokio::fs::read(file).await?;
        let uri = data_uri(mime_for(file), &bytes);

        self.mirror
            .update(|list: &mut Vec<Seminar>| {
                list.iter_mut().find(|s| s.has_id(seminar_id)).map(|seminar| {
                    seminar.certificate_template_url = Some(uri);
                    seminar.clone()
                })
            })?
            .ok_or_else(|| DeskError::NotFound("Seminar not found".into()))
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

fn mime_for(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
