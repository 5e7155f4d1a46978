use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use readscore_analysis::{AccuracyResult, AudioUpload, ReadingReport};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{error::ApiError, state::AppState};

const MP3_MIME_TYPES: &[&str] = &["audio/mpeg", "audio/mp3", "audio/mpeg3", "audio/x-mpeg-3"];

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub transcription: String,
    pub analysis: String,
    pub reading_speed: f64,
    pub feedback: String,
    pub corrected_transcription: String,
    pub accuracy: f64,
    pub accuracy_details: AccuracyResult,
    pub cost: CostResponse,
}

#[derive(Debug, Serialize)]
pub struct CostResponse {
    #[serde(rename = "assemblyAI")]
    pub transcription: f64,
    #[serde(rename = "openAI")]
    pub diff: f64,
}

impl From<ReadingReport> for AnalyzeResponse {
    fn from(report: ReadingReport) -> Self {
        Self {
            transcription: report.transcription,
            analysis: report.analysis,
            reading_speed: report.reading_speed,
            feedback: report.feedback,
            corrected_transcription: report.corrected_transcription,
            accuracy: report.accuracy.percentage,
            accuracy_details: report.accuracy,
            cost: CostResponse {
                transcription: report.cost.transcription,
                diff: report.cost.diff,
            },
        }
    }
}

/// Validated `POST /analyze` form.
struct AnalyzeForm {
    audio: AudioUpload,
    text: String,
}

/// Scores a reading: multipart `file` (mp3) plus the reference `text`, and an
/// optional `language` hint for the transcription.
///
/// The analysis runs inside the request future; a client that disconnects
/// drops it, which also stops the transcription polling.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let form = read_form(multipart, state.max_upload_bytes)
        .await
        .inspect_err(|e| warn!(error = %e, "Validation error"))?;

    let report = state
        .analyzer
        .analyze(form.audio, &form.text)
        .await
        .inspect_err(|e| error!(error = %e, "Error during analyze process"))?;

    info!(accuracy = report.accuracy.percentage, "Analyze request served");
    Ok(Json(report.into()))
}

async fn read_form(mut multipart: Multipart, max_upload_bytes: usize) -> Result<AnalyzeForm, ApiError> {
    let mut audio: Option<AudioUpload> = None;
    let mut text: Option<String> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                audio = Some(AudioUpload {
                    bytes: bytes.to_vec(),
                    mime_type,
                    file_name,
                    language_hint: None,
                });
            }
            Some("text") => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, max_upload_bytes))?,
                );
            }
            Some("language") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                let value = value.trim();
                if !value.is_empty() {
                    language = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let mut audio = audio.ok_or_else(|| ApiError::Validation("Audio file is required.".to_string()))?;
    if audio.bytes.is_empty() {
        return Err(ApiError::Validation(
            "The uploaded file must be a valid file.".to_string(),
        ));
    }
    if !is_mp3(&audio) {
        return Err(ApiError::Validation(
            "Only mp3 file formats are allowed.".to_string(),
        ));
    }
    if audio.bytes.len() > max_upload_bytes {
        return Err(too_large(max_upload_bytes));
    }

    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Text input is required.".to_string()))?;

    audio.language_hint = language;
    Ok(AnalyzeForm { audio, text })
}

fn is_mp3(audio: &AudioUpload) -> bool {
    MP3_MIME_TYPES.contains(&audio.mime_type.as_str())
        || audio.file_name.to_ascii_lowercase().ends_with(".mp3")
}

fn too_large(max_upload_bytes: usize) -> ApiError {
    const MIB: usize = 1024 * 1024;
    let limit = if max_upload_bytes >= MIB && max_upload_bytes % MIB == 0 {
        format!("{}MB", max_upload_bytes / MIB)
    } else {
        format!("{max_upload_bytes} bytes")
    };
    ApiError::Validation(format!("File size cannot exceed {limit}."))
}

fn multipart_error(err: MultipartError, max_upload_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_upload_bytes)
    } else {
        ApiError::MalformedForm(err.body_text())
    }
}
