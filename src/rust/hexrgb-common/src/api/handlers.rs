//! 共通APIハンドラー実装

use actix_web::http::StatusCode;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::color::hex_to_rgb;
use crate::error::{HexRgbError, ParamSource, Result};
use super::models::{ApiDocument, ApiResponse, ConversionData, ErrorResponse, RawParams};

/// ルートを登録する
///
/// 404フォールバックは `App::default_service(web::to(not_found))` で別途設定すること。
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api", web::get().to(api_document))
        .route("/api/convert/hex-to-rgb", web::get().to(hex_to_rgb_query))
        .route("/api/convert/hex-to-rgb", web::post().to(hex_to_rgb_body))
        .route("/api/convert/rgb-to-hex", web::get().to(rgb_to_hex_query))
        .route("/api/convert/rgb-to-hex", web::post().to(rgb_to_hex_body));
}

/// GET /api/convert/hex-to-rgb
pub async fn hex_to_rgb_query(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    info!("Processing hex-to-rgb query request");
    let params = RawParams::from_pairs(query.into_inner());
    respond(process_hex_to_rgb(&params, ParamSource::Query))
}

/// POST /api/convert/hex-to-rgb
pub async fn hex_to_rgb_body(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    info!("Processing hex-to-rgb body request");
    let result = parse_body(&req, &body)
        .and_then(|params| process_hex_to_rgb(&params, ParamSource::Body));
    respond(result)
}

/// GET /api/convert/rgb-to-hex
pub async fn rgb_to_hex_query(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    info!("Processing rgb-to-hex query request");
    let params = RawParams::from_pairs(query.into_inner());
    respond(process_rgb_to_hex(&params))
}

/// POST /api/convert/rgb-to-hex
pub async fn rgb_to_hex_body(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    info!("Processing rgb-to-hex body request");
    let result = parse_body(&req, &body).and_then(|params| process_rgb_to_hex(&params));
    respond(result)
}

/// GET /api
pub async fn api_document() -> HttpResponse {
    HttpResponse::Ok().json(ApiDocument::new())
}

/// どのルートにも一致しなかった場合の終端ハンドラー
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("No route for {} {}", req.method(), req.path());
    error_response(&HexRgbError::RouteNotFound)
}

/// HEX -> RGB の共通処理
pub fn process_hex_to_rgb(params: &RawParams, source: ParamSource) -> Result<ConversionData> {
    let hex = params.hex(source)?;
    let rgb = hex_to_rgb(hex).ok_or(HexRgbError::InvalidHexFormat)?;
    debug!("Converted {} to {:?}", hex, rgb);
    Ok(ConversionData::from(rgb))
}

/// RGB -> HEX の共通処理
pub fn process_rgb_to_hex(params: &RawParams) -> Result<ConversionData> {
    let rgb = params.rgb()?;
    let data = ConversionData::from(rgb);
    debug!("Converted {:?} to {}", rgb, data.hex);
    Ok(data)
}

/// Content-Type に応じてボディを解析
///
/// JSONとフォームのみ解釈し、それ以外（空ボディ含む）は空のパラメータとする。
fn parse_body(req: &HttpRequest, body: &[u8]) -> Result<RawParams> {
    if body.is_empty() {
        return Ok(RawParams::default());
    }

    // MIMEタイプは大文字小文字を区別しない
    let content_type = req.content_type().to_ascii_lowercase();
    if content_type == "application/json" || content_type.ends_with("+json") {
        RawParams::from_json(body)
    } else if content_type == "application/x-www-form-urlencoded" {
        let form = std::str::from_utf8(body)
            .ok()
            .and_then(|s| web::Query::<HashMap<String, String>>::from_query(s).ok())
            .map(|q| q.into_inner())
            .unwrap_or_default();
        Ok(RawParams::from_pairs(form))
    } else {
        debug!("Ignoring body with content type {:?}", content_type);
        Ok(RawParams::default())
    }
}

fn respond(result: Result<ConversionData>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data)),
        Err(e) => {
            warn!("Conversion rejected: {}", e);
            error_response(&e)
        }
    }
}

/// エラーをJSONレスポンスに変換
pub fn error_response(err: &HexRgbError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ErrorResponse::from(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .configure(configure)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_get_hex_to_rgb() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/hex-to-rgb?hex=FF5733")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["rgb"], json!({ "r": 255, "g": 87, "b": 51 }));
        assert_eq!(body["data"]["hex"], json!("#FF5733"));
        assert_eq!(body["data"]["css"], json!("rgb(255, 87, 51)"));
    }

    #[actix_web::test]
    async fn test_get_hex_to_rgb_with_prefix_and_lowercase() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/hex-to-rgb?hex=%23ffffff")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["rgb"], json!({ "r": 255, "g": 255, "b": 255 }));
        assert_eq!(body["data"]["hex"], json!("#FFFFFF"));
    }

    #[actix_web::test]
    async fn test_get_hex_to_rgb_shorthand() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/hex-to-rgb?hex=F0F")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["rgb"], json!({ "r": 255, "g": 0, "b": 255 }));
        assert_eq!(body["data"]["hex"], json!("#FF00FF"));
    }

    #[actix_web::test]
    async fn test_get_hex_to_rgb_missing() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/convert/hex-to-rgb").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Missing hex parameter",
                "message": "Please provide a hex color code in the query string"
            })
        );
    }

    #[actix_web::test]
    async fn test_get_hex_to_rgb_invalid() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/hex-to-rgb?hex=INVALID")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Invalid hex color code"));
        assert_eq!(
            body["message"],
            json!("Please provide a valid hex color code (e.g., FFFFFF or #FFFFFF)")
        );
    }

    #[actix_web::test]
    async fn test_post_hex_to_rgb() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/hex-to-rgb")
            .set_json(json!({ "hex": "00FF00" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["rgb"], json!({ "r": 0, "g": 255, "b": 0 }));
    }

    #[actix_web::test]
    async fn test_post_hex_to_rgb_missing() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/hex-to-rgb")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Missing hex parameter"));
        assert_eq!(body["message"], json!("Please provide a hex color code in the request body"));
    }

    #[actix_web::test]
    async fn test_post_hex_to_rgb_without_body() {
        let app = app!();
        let req = test::TestRequest::post().uri("/api/convert/hex-to-rgb").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("Missing hex parameter"));
    }

    #[actix_web::test]
    async fn test_post_hex_to_rgb_form_body() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/hex-to-rgb")
            .set_form(vec![("hex", "#03643c")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["rgb"], json!({ "r": 3, "g": 100, "b": 60 }));
    }

    #[actix_web::test]
    async fn test_post_malformed_json() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/hex-to-rgb")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"hex\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Invalid JSON body"));
    }

    #[actix_web::test]
    async fn test_post_mixed_case_content_type() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/hex-to-rgb")
            .insert_header(("content-type", "Application/JSON"))
            .set_payload(r#"{"hex": "FF5733"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["hex"], json!("#FF5733"));

        let req = test::TestRequest::post()
            .uri("/api/convert/rgb-to-hex")
            .insert_header(("content-type", "Application/X-WWW-Form-Urlencoded"))
            .set_payload("r=3&g=100&b=60")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["hex"], json!("#03643C"));
    }

    #[actix_web::test]
    async fn test_get_rgb_to_hex() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/rgb-to-hex?r=3&g=100&b=60")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["hex"], json!("#03643C"));
        assert_eq!(body["data"]["rgb"], json!({ "r": 3, "g": 100, "b": 60 }));
        assert_eq!(body["data"]["css"], json!("rgb(3, 100, 60)"));
    }

    #[actix_web::test]
    async fn test_get_rgb_to_hex_out_of_range() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/rgb-to-hex?r=300&g=-1&b=60")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        // RGB側のエラーには message が無い
        assert_eq!(body, json!({ "success": false, "error": "Invalid RGB values" }));
    }

    #[actix_web::test]
    async fn test_get_rgb_to_hex_missing_fields() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/convert/rgb-to-hex?r=10")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("Invalid RGB values"));
    }

    #[actix_web::test]
    async fn test_post_rgb_to_hex() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/rgb-to-hex")
            .set_json(json!({ "r": 255, "g": 87, "b": 51 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["hex"], json!("#FF5733"));
        assert_eq!(body["data"]["css"], json!("rgb(255, 87, 51)"));
    }

    #[actix_web::test]
    async fn test_post_rgb_to_hex_string_values() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/rgb-to-hex")
            .set_json(json!({ "r": "4", "g": "200", "b": "150" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["hex"], json!("#04C896"));
        assert_eq!(body["data"]["rgb"], json!({ "r": 4, "g": 200, "b": 150 }));
    }

    #[actix_web::test]
    async fn test_post_rgb_to_hex_missing_fields() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/convert/rgb-to-hex")
            .set_json(json!({ "r": 255 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert!(body.get("message").is_none());
    }

    #[actix_web::test]
    async fn test_api_document() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], json!("HEX to RGB Conversion API"));
        assert_eq!(body["version"], json!("1.0.0"));
        assert!(body["endpoints"].is_object());
        assert!(body["examples"].is_object());
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = app!();
        let req = test::TestRequest::get().uri("/unknown-route").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": false, "error": "Route not found" }));
    }

    #[actix_web::test]
    async fn test_wrong_method_is_not_found() {
        let app = app!();
        let req = test::TestRequest::delete()
            .uri("/api/convert/hex-to-rgb")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
