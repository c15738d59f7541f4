use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{ErrorResponse, RentData};
use tracing::info;

use crate::AppState;

/// Create a router for bike catalog and rental desk APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bikes))
        .route("/rent", post(rent_bike))
        .route("/:bike_id", get(get_bike))
}

async fn list_bikes(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/bikes");
    (StatusCode::OK, Json(state.catalog.list_bikes())).into_response()
}

async fn get_bike(State(state): State<AppState>, Path(bike_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/bikes/{}", bike_id);

    match state.catalog.get_bike(&bike_id) {
        Some(bike) => (StatusCode::OK, Json(bike)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Bike {} not found", bike_id),
            }),
        )
            .into_response(),
    }
}

/// The rental desk: 200 when the rental is recorded, 400 when it is malformed
async fn rent_bike(State(state): State<AppState>, Json(request): Json<RentData>) -> impl IntoResponse {
    info!("POST /api/bikes/rent - request: {:?}", request);

    let response = state.rental_desk.rent(&request);
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::{create_router, initialize_backend};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use shared::{Bike, RentResponse};
    use tower::ServiceExt;

    fn app() -> Result<Router, Box<dyn std::error::Error>> {
        let config = AppConfig::default();
        let app_state = initialize_backend(&config)?;
        Ok(create_router(app_state, &config)?)
    }

    #[tokio::test]
    async fn test_list_bikes() -> Result<(), Box<dyn std::error::Error>> {
        let response = app()?
            .oneshot(Request::builder().uri("/api/bikes").method(Method::GET).body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let bikes: Vec<Bike> = serde_json::from_slice(&body)?;
        assert_eq!(bikes.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_bike() -> Result<(), Box<dyn std::error::Error>> {
        let app = app()?;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/bikes/bike-2").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let bike: Bike = serde_json::from_slice(&body)?;
        assert_eq!(bike.name, "Trail Blazer");

        let response = app
            .oneshot(Request::builder().uri("/api/bikes/unknown").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_rent_bike() -> Result<(), Box<dyn std::error::Error>> {
        let app = app()?;

        let good = RentData {
            bike_id: Some("bike-1".to_string()),
            user_id: "user-1".to_string(),
            date_from: "2024-05-01".to_string(),
            date_to: "2024-05-03".to_string(),
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/bikes/rent")
                    .method(Method::POST)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&good)?))?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let reply: RentResponse = serde_json::from_slice(&body)?;
        assert_eq!(reply.status, 200);
        assert!(reply.rental_id.is_some());

        let backwards = RentData {
            date_from: "2024-05-03".to_string(),
            date_to: "2024-05-01".to_string(),
            ..good
        };
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/bikes/rent")
                    .method(Method::POST)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&backwards)?))?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
