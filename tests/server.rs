use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use diabetes_predictor::{
    models::{Classifier, InferenceEngine, PredictError},
    server::{router, PredictResponse, ReadinessResponse},
    types::{FeatureVector, MODEL_UNAVAILABLE_MESSAGE, NOT_FITTED_MESSAGE},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Predicts positive when glucose is above 125
struct GlucoseThreshold;

impl Classifier for GlucoseThreshold {
    fn name(&self) -> &str {
        "glucose-threshold"
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        Ok(if features.glucose > 125.0 { 1 } else { 0 })
    }

    fn supports_probability(&self) -> bool {
        true
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        if features.glucose > 125.0 {
            Ok(vec![0.2, 0.8])
        } else {
            Ok(vec![0.9, 0.1])
        }
    }
}

struct Unfitted;

impl Classifier for Unfitted {
    fn name(&self) -> &str {
        "unfitted"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<i64, PredictError> {
        Err(PredictError::NotFitted)
    }
}

fn app_with(model: Option<Arc<dyn Classifier>>) -> Router {
    router(Arc::new(InferenceEngine::new(model)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn api_predicts_positive_with_probability() {
    let app = app_with(Some(Arc::new(GlucoseThreshold)));
    let request = json_request(
        "/api/predict",
        json!({
            "Pregnancies": 2, "Glucose": 130, "BloodPressure": 70, "SkinThickness": 20,
            "Insulin": 79, "BMI": 30.0, "DiabetesPedigreeFunction": 0.5, "Age": 33
        }),
    );

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let response: PredictResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.outcome, "predicted");
    assert!(response.result.starts_with("🔴 Positive"));
    assert!(response.result.contains("Probability (positive): 0.800"));
    assert_eq!(response.probability, Some(0.8));
    assert_eq!(response.features.unwrap().glucose, 130.0);
}

#[tokio::test]
async fn api_coerces_bad_values_to_zero() {
    let app = app_with(Some(Arc::new(GlucoseThreshold)));
    let request = json_request("/api/predict", json!({"Glucose": "lots", "Age": "51"}));

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let response: PredictResponse = serde_json::from_str(&body).unwrap();
    let features = response.features.unwrap();
    assert_eq!(features.glucose, 0.0);
    assert_eq!(features.age, 51.0);
    assert!(response.result.starts_with("🟢 Negative"));
}

#[tokio::test]
async fn api_without_model_returns_fixed_message() {
    let app = app_with(None);
    let request = json_request("/api/predict", json!({"Glucose": 200}));

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let response: PredictResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.result, MODEL_UNAVAILABLE_MESSAGE);
    assert_eq!(response.outcome, "model_unavailable");
    assert!(response.label.is_none());
}

#[tokio::test]
async fn api_reports_unfitted_model() {
    let app = app_with(Some(Arc::new(Unfitted)));
    let request = json_request("/api/predict", json!({}));

    let (_, body) = send(app, request).await;
    let response: PredictResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.result, NOT_FITTED_MESSAGE);
}

#[tokio::test]
async fn form_submission_renders_result() {
    let app = app_with(Some(Arc::new(GlucoseThreshold)));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "Pregnancies=6&Glucose=140&BloodPressure=90&SkinThickness=30&Insulin=130\
             &BMI=35.5&DiabetesPedigreeFunction=0.65&Age=48",
        ))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("🔴 Positive\nProbability (positive): 0.800"));
    assert!(body.contains(r#"name="Glucose" value="140""#));
}

#[tokio::test]
async fn index_prefills_from_query() {
    let app = app_with(None);
    let request = Request::builder()
        .uri("/?Glucose=99")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="Glucose" value="99""#));
    assert!(body.contains(r#"name="Age" value="33""#));
    assert!(body.contains("No model is loaded"));
}

#[tokio::test]
async fn probes_reflect_model_state() {
    let request = || Request::builder().uri("/readyz").body(Body::empty()).unwrap();

    let (status, body) = send(app_with(None), request()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let ready: ReadinessResponse = serde_json::from_str(&body).unwrap();
    assert!(!ready.model_loaded);

    let (status, body) = send(app_with(Some(Arc::new(GlucoseThreshold))), request()).await;
    assert_eq!(status, StatusCode::OK);
    let ready: ReadinessResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(ready.model.as_deref(), Some("glucose-threshold"));

    let liveness = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, _) = send(app_with(None), liveness).await;
    assert_eq!(status, StatusCode::OK);
}
