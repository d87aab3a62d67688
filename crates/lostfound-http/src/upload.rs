//! Multipart form parsing for item submissions.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::HeaderMap;
use axum::http::header::HOST;

use lostfound_core::{MediaRef, MediaUpload, NewItem};

/// Fields of a `POST /items` form.
#[derive(Debug, Default)]
pub(crate) struct CreateItemForm {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) contact: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) image: Option<MediaUpload>,
}

impl CreateItemForm {
    /// Read every field of the form. Unknown fields are ignored, and an
    /// empty file part (a file input left blank) counts as no image.
    pub(crate) async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "title" => form.title = Some(field.text().await?),
                "description" => form.description = Some(field.text().await?),
                "contact" => form.contact = Some(field.text().await?),
                "location" => form.location = Some(field.text().await?),
                "image" => {
                    let original_name = field.file_name().unwrap_or_default().to_string();
                    let mime = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;

                    if original_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    form.image = Some(MediaUpload::new(bytes.to_vec(), original_name, mime));
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The text fields as a submission; absent fields become empty strings.
    pub(crate) fn new_item(&self) -> NewItem {
        let mut item = NewItem::new(
            self.title.clone().unwrap_or_default(),
            self.description.clone().unwrap_or_default(),
            self.contact.clone().unwrap_or_default(),
        );
        if let Some(location) = &self.location {
            item = item.with_location(location.clone());
        }
        item
    }
}

/// Absolute URL under which a stored image is served.
pub(crate) fn image_url(public_url: Option<&str>, headers: &HeaderMap, media: &MediaRef) -> String {
    format!("{}/uploads/{}", base_url(public_url, headers), media)
}

fn base_url(public_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = public_url {
        return url.trim_end_matches('/').to_string();
    }

    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");

    format!("{}://{}", scheme, host)
}
