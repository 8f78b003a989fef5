// Earnings Reconciliation - Upload Server
// POST two statement CSVs, get the reconciliation report back as JSON

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use earnings_recon::{
    pipeline, AscapParser, BmiParser, MatchEngine, ReconWarning, ReportModel, RoyaltyParser,
    SchemaError,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

/// Matches the original deployment's 200MB statement upload ceiling
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Comparison response: the report plus run statistics
#[derive(Serialize)]
struct CompareResponse {
    report: ReportModel,
    warnings: Vec<String>,
    shows_analyzed: usize,
    rows_only_in_ascap: usize,
    rows_only_in_bmi: usize,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(format!("earnings-recon {}", earnings_recon::VERSION)))
}

/// POST /api/compare - multipart fields "ascap" and "bmi", each one CSV
async fn compare(mut multipart: Multipart) -> impl IntoResponse {
    let mut ascap_bytes: Option<Vec<u8>> = None;
    let mut bmi_bytes: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or("").to_string();
                let bytes = match field.bytes().await {
                    Ok(b) => b.to_vec(),
                    Err(e) => return bad_request(format!("Failed to read upload: {}", e)),
                };
                match name.as_str() {
                    "ascap" => ascap_bytes = Some(bytes),
                    "bmi" => bmi_bytes = Some(bytes),
                    _ => {}
                }
            }
            Ok(None) => break,
            Err(e) => return bad_request(format!("Malformed multipart body: {}", e)),
        }
    }

    let (ascap_bytes, bmi_bytes) = match (ascap_bytes, bmi_bytes) {
        (Some(a), Some(b)) => (a, b),
        _ => return bad_request("Both ASCAP and BMI files are required".to_string()),
    };

    let records_a = match AscapParser.parse_reader(ascap_bytes.as_slice()) {
        Ok(records) => records,
        Err(e) => return schema_error(e),
    };
    let records_b = match BmiParser.parse_reader(bmi_bytes.as_slice()) {
        Ok(records) => records,
        Err(e) => return schema_error(e),
    };

    let outcome = pipeline::run(&MatchEngine::new(), &records_a, &records_b);

    let response = CompareResponse {
        warnings: outcome
            .warnings
            .iter()
            .map(ReconWarning::to_string)
            .collect(),
        shows_analyzed: outcome.report.summary.len(),
        rows_only_in_ascap: outcome.report.unmatched_a_detail.len(),
        rows_only_in_bmi: outcome.report.unmatched_b_detail.len(),
        report: outcome.report,
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<CompareResponse>::err(message)),
    )
        .into_response()
}

fn schema_error(e: SchemaError) -> axum::response::Response {
    eprintln!("Schema error in upload: {}", e);
    bad_request(e.to_string())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Earnings Reconciliation - Upload Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/compare", post(compare));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   POST http://localhost:3000/api/compare (fields: ascap, bmi)");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
