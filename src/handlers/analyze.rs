use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};

use crate::handlers::app::IndexTemplate;
use crate::models::{Evidence, MAX_IMAGES};
use crate::startup::AppState;

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub analysis: Option<String>,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

/// Handle a form submission: collect the evidence, cap the screenshots,
/// dispatch one analysis call and render whatever comes back.
///
/// Any failure of the remote call ends up as a banner on the result page,
/// with the underlying error text.
pub async fn analyze(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut message: Option<String> = None;
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("message") => {
                if let Ok(text) = field.text().await {
                    message = Some(text);
                }
            }
            Some("images") => {
                let file_name = field.file_name().unwrap_or("screenshot").to_string();
                match field.bytes().await {
                    // A file input with no selection still submits one empty part.
                    Ok(bytes) if bytes.is_empty() => {}
                    Ok(bytes) => files.push((file_name, bytes.to_vec())),
                    Err(e) => {
                        tracing::error!(file_name = %file_name, error = %e, "Failed to read upload");
                    }
                }
            }
            _ => {}
        }
    }

    let (evidence, mut warnings) = collect_evidence(message, files);

    if evidence.is_empty() {
        // Keep any skipped-file notes so the user can tell why nothing was
        // submitted.
        warnings.push("Paste a message or attach at least one screenshot first.".to_string());
        return IndexTemplate { warnings }.into_response();
    }

    match state.dispatcher.analyze(&evidence).await {
        Ok(text) => ResultTemplate {
            analysis: Some(text),
            error: None,
            warnings,
        }
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "analysis request failed");
            ResultTemplate {
                analysis: None,
                error: Some(e.to_string()),
                warnings,
            }
            .into_response()
        }
    }
}

/// Turn the raw form fields into ordered evidence: the pasted message first,
/// then the screenshots as uploaded. Files that are not readable images are
/// skipped; of the images that remain, at most [`MAX_IMAGES`] are kept, in
/// original order. Either case adds a warning for the result page.
fn collect_evidence(
    message: Option<String>,
    files: Vec<(String, Vec<u8>)>,
) -> (Vec<Evidence>, Vec<String>) {
    let mut evidence = Vec::new();
    let mut warnings = Vec::new();

    if let Some(text) = message {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            evidence.push(Evidence::Text(trimmed.to_string()));
        }
    }

    let mut images = Vec::new();
    for (file_name, data) in files {
        match image::guess_format(&data) {
            Ok(format) => images.push(Evidence::Image {
                mime_type: format.to_mime_type().to_string(),
                data,
            }),
            Err(_) => {
                tracing::warn!(file_name = %file_name, "upload is not a readable image, skipping");
                warnings.push(format!("{file_name}: not a readable image, skipped."));
            }
        }
    }

    // The cap counts images, not raw uploads: a skipped file must not push a
    // later screenshot out of the payload.
    if images.len() > MAX_IMAGES {
        warnings.push(format!(
            "More than {MAX_IMAGES} screenshots attached; only the first {MAX_IMAGES} were analyzed."
        ));
        images.truncate(MAX_IMAGES);
    }

    evidence.extend(images);

    (evidence, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(tag: u8) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(1, 1)
            .write_to(&mut buf, image::ImageFormat::Png)
            .expect("encode png");
        let mut bytes = buf.into_inner();
        // Trailing junk keeps the signature intact but makes each file unique.
        bytes.push(tag);
        bytes
    }

    #[test]
    fn message_precedes_screenshots_in_submission_order() {
        let files = vec![
            ("a.png".to_string(), png_bytes(1)),
            ("b.png".to_string(), png_bytes(2)),
        ];
        let (evidence, warnings) =
            collect_evidence(Some("pay via Western Union".to_string()), files.clone());

        assert!(warnings.is_empty());
        assert_eq!(evidence.len(), 3);
        assert_eq!(evidence[0], Evidence::Text("pay via Western Union".to_string()));
        for (i, (_, data)) in files.iter().enumerate() {
            match &evidence[i + 1] {
                Evidence::Image { mime_type, data: d } => {
                    assert_eq!(mime_type, "image/png");
                    assert_eq!(d, data);
                }
                Evidence::Text(_) => panic!("expected an image at position {}", i + 1),
            }
        }
    }

    #[test]
    fn whitespace_only_message_is_not_evidence() {
        let (evidence, warnings) = collect_evidence(Some("   \n".to_string()), Vec::new());
        assert!(evidence.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn more_than_four_screenshots_keeps_first_four_and_warns() {
        let files: Vec<_> = (0..6)
            .map(|i| (format!("shot{i}.png"), png_bytes(i)))
            .collect();
        let (evidence, warnings) = collect_evidence(None, files.clone());

        assert_eq!(evidence.len(), MAX_IMAGES);
        for (i, item) in evidence.iter().enumerate() {
            match item {
                Evidence::Image { data, .. } => assert_eq!(data, &files[i].1),
                Evidence::Text(_) => panic!("expected only images"),
            }
        }
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("first 4"));
    }

    #[test]
    fn skipped_file_does_not_count_against_the_screenshot_cap() {
        // An unreadable file ahead of five real screenshots: the cap applies
        // to the images that survive sniffing, so the first four screenshots
        // all make it through.
        let mut files = vec![("notes.txt".to_string(), b"just some text".to_vec())];
        let screenshots: Vec<_> = (0..5)
            .map(|i| (format!("shot{i}.png"), png_bytes(i)))
            .collect();
        files.extend(screenshots.clone());

        let (evidence, warnings) = collect_evidence(None, files);

        assert_eq!(evidence.len(), MAX_IMAGES);
        for (i, item) in evidence.iter().enumerate() {
            match item {
                Evidence::Image { data, .. } => assert_eq!(data, &screenshots[i].1),
                Evidence::Text(_) => panic!("expected only images"),
            }
        }
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("notes.txt"));
        assert!(warnings[1].contains("first 4"));
    }

    #[test]
    fn unreadable_file_is_skipped_with_warning() {
        let files = vec![
            ("notes.txt".to_string(), b"just some text".to_vec()),
            ("real.png".to_string(), png_bytes(9)),
        ];
        let (evidence, warnings) = collect_evidence(None, files);

        assert_eq!(evidence.len(), 1);
        assert!(evidence[0].is_image());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("notes.txt"));
    }
}
