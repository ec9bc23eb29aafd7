use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use timeline::Timeline;
use timeline_core::{
    AccountId, AccountView, CustomerId, CustomerUpdate, CustomerView, NewCustomer, NewProduct,
    ProductId, RepositoryProvider,
};

use crate::{
    error::Result,
    extractors::{ApiJson, ApiPath, CurrentCaller},
    middleware::{AppState, authorization_header, require_bearer},
    types::*,
};

/// Build the full API router.
///
/// Reading, updating and deleting records requires a bearer token; creating
/// them and the `/auth` routes do not.
pub fn create_router<R>(timeline: Arc<Timeline<R>>) -> Router
where
    R: RepositoryProvider,
{
    let state = AppState { timeline };

    let protected_routes = Router::new()
        .route("/users", get(list_users_handler::<R>))
        .route(
            "/users/{id}",
            get(get_user_handler::<R>)
                .patch(update_user_handler::<R>)
                .delete(delete_user_handler::<R>),
        )
        .route("/customers", get(list_customers_handler::<R>))
        .route(
            "/customers/{id}",
            get(get_customer_handler::<R>)
                .patch(update_customer_handler::<R>)
                .delete(delete_customer_handler::<R>),
        )
        .route("/products", get(list_products_handler::<R>))
        .route(
            "/products/{id}",
            get(get_product_handler::<R>)
                .put(replace_product_handler::<R>)
                .delete(delete_product_handler::<R>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer::<R>,
        ));

    let open_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<R>))
        .route("/auth/sign-in", post(sign_in_handler::<R>))
        .route("/auth/register", post(register_handler::<R>))
        .route(
            "/auth/authenticated-user",
            get(authenticated_user_handler::<R>),
        )
        .route("/users", post(create_user_handler::<R>))
        .route("/customers", post(create_customer_handler::<R>))
        .route("/products", post(create_product_handler::<R>));

    Router::new()
        .merge(protected_routes)
        .merge(open_routes)
        .with_state(state)
}

async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        status: "OK",
        message: "Timeline API is running",
    })
}

async fn health_handler<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state.timeline.health_check().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

async fn sign_in_handler<R>(
    State(state): State<AppState<R>>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let session = state
        .timeline
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        data: session,
    }))
}

async fn register_handler<R>(
    State(state): State<AppState<R>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let session = state
        .timeline
        .register(
            &request.full_name,
            &request.email,
            &request.password,
            request.role.as_deref(),
        )
        .await?;

    Ok(Json(AuthResponse {
        message: "Registration successful",
        data: session,
    }))
}

async fn authenticated_user_handler<R>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
) -> Result<Json<AccountView>>
where
    R: RepositoryProvider,
{
    let user = state
        .timeline
        .resolve_caller(authorization_header(&headers))
        .await?;

    Ok(Json(user))
}

// Users

async fn list_users_handler<R>(
    State(state): State<AppState<R>>,
) -> Result<Json<DataResponse<Vec<AccountView>>>>
where
    R: RepositoryProvider,
{
    let accounts = state.timeline.accounts().list().await?;

    Ok(Json(DataResponse {
        data: accounts.iter().map(|account| account.view()).collect(),
    }))
}

async fn get_user_handler<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<DataResponse<AccountView>>>
where
    R: RepositoryProvider,
{
    let account = state.timeline.accounts().get(id).await?;
    Ok(Json(DataResponse {
        data: account.view(),
    }))
}

async fn create_user_handler<R>(
    State(state): State<AppState<R>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let account = state
        .timeline
        .accounts()
        .create(
            &request.full_name,
            &request.email,
            &request.password,
            request.role.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: account.view(),
        }),
    ))
}

async fn update_user_handler<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<AccountId>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<DataResponse<AccountView>>>
where
    R: RepositoryProvider,
{
    let account = state.timeline.accounts().update(id, request.into()).await?;
    Ok(Json(DataResponse {
        data: account.view(),
    }))
}

async fn delete_user_handler<R>(
    State(state): State<AppState<R>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<DataResponse<MessageResponse>>>
where
    R: RepositoryProvider,
{
    state.timeline.accounts().delete(id).await?;
    tracing::info!(account_id = %id, deleted_by = %caller.account_id, "User deleted");

    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "User deleted successfully",
        },
    }))
}

// Customers

async fn list_customers_handler<R>(
    State(state): State<AppState<R>>,
) -> Result<Json<DataResponse<Vec<CustomerView>>>>
where
    R: RepositoryProvider,
{
    let customers = state.timeline.customers().list().await?;

    Ok(Json(DataResponse {
        data: customers.iter().map(|customer| customer.view()).collect(),
    }))
}

async fn get_customer_handler<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<DataResponse<CustomerView>>>
where
    R: RepositoryProvider,
{
    let customer = state.timeline.customers().get(id).await?;
    Ok(Json(DataResponse {
        data: customer.view(),
    }))
}

async fn create_customer_handler<R>(
    State(state): State<AppState<R>>,
    ApiJson(request): ApiJson<NewCustomer>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let customer = state.timeline.customers().create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: customer.view(),
        }),
    ))
}

async fn update_customer_handler<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(request): ApiJson<CustomerUpdate>,
) -> Result<Json<DataResponse<CustomerView>>>
where
    R: RepositoryProvider,
{
    let customer = state.timeline.customers().update(id, request).await?;
    Ok(Json(DataResponse {
        data: customer.view(),
    }))
}

async fn delete_customer_handler<R>(
    State(state): State<AppState<R>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<CustomerId>,
) -> Result<Json<DataResponse<MessageResponse>>>
where
    R: RepositoryProvider,
{
    state.timeline.customers().delete(id).await?;
    tracing::info!(customer_id = %id, deleted_by = %caller.account_id, "Customer deleted");

    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "Customer deleted successfully",
        },
    }))
}

// Products

async fn list_products_handler<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    Ok(Json(state.timeline.products().list().await?))
}

async fn get_product_handler<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    Ok(Json(state.timeline.products().get(id).await?))
}

async fn create_product_handler<R>(
    State(state): State<AppState<R>>,
    ApiJson(request): ApiJson<NewProduct>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let product = state.timeline.products().create(request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn replace_product_handler<R>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(request): ApiJson<NewProduct>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    Ok(Json(state.timeline.products().replace(id, request).await?))
}

async fn delete_product_handler<R>(
    State(state): State<AppState<R>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state.timeline.products().delete(id).await?;
    tracing::info!(product_id = %id, deleted_by = %caller.account_id, "Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted",
    }))
}
