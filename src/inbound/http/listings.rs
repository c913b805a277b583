//! Listing HTTP handlers.
//!
//! ```text
//! POST   /api/listings        create (auth required)
//! GET    /api/listings        search
//! GET    /api/listings/{id}   fetch one
//! PUT    /api/listings/{id}   update (auth + ownership)
//! DELETE /api/listings/{id}   delete (auth + ownership)
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::SearchRequest;
use crate::domain::search::{
    KindFilter, ListingFilter, SearchTokens, Sort, SortField, SortOrder, TriState, UnknownParam,
};
use crate::domain::{Error, Listing, ListingDraft, ListingId, ListingKind, ListingPatch};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Area intake: the wire accepts a string or a bare number and the record
/// stores text either way.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AreaValue {
    Text(String),
    Number(serde_json::Number),
}

impl AreaValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Request body for `POST /api/listings`.
///
/// Fields are optional at the serde level so missing ones surface as the
/// service's own error envelope instead of a deserializer message.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub area: Option<AreaValue>,
    pub bedrooms: Option<u32>,
    pub features: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Optional; when absent a description is generated.
    pub description: Option<String>,
    pub offer: Option<bool>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
}

/// Request body for `PUT /api/listings/{id}`: any subset of the mutable
/// fields. Unknown fields (including `owner` and `id`) are ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub area: Option<AreaValue>,
    pub bedrooms: Option<u32>,
    pub features: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub offer: Option<bool>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
}

/// Listing payload returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub name: String,
    pub area: String,
    pub bedrooms: u32,
    pub features: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub offer: bool,
    pub furnished: bool,
    pub parking: bool,
    pub owner: String,
    pub created_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(value: Listing) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            area: value.area,
            bedrooms: value.bedrooms,
            features: value.features,
            kind: value.kind.to_string(),
            description: value.description,
            offer: value.offer,
            furnished: value.furnished,
            parking: value.parking,
            owner: value.owner.to_string(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Search query parameters for `GET /api/listings`.
///
/// Numeric parameters are parsed leniently: garbage falls back to the
/// defaults rather than failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub limit: Option<String>,
    pub start_index: Option<String>,
    pub search_term: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub offer: Option<String>,
    pub furnished: Option<String>,
    pub parking: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn map_unknown_param(error: UnknownParam) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field,
        "value": error.value,
        "code": "unsupported_value",
    }))
}

fn parse_kind(raw: &str) -> Result<ListingKind, Error> {
    ListingKind::parse(raw).map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": "type",
            "value": raw,
            "code": "unsupported_value",
        }))
    })
}

fn parse_listing_id(raw: &str) -> Result<ListingId, Error> {
    ListingId::parse(raw).map_err(|_| {
        Error::invalid_request("listing id must be a valid UUID")
            .with_details(json!({ "field": "id", "value": raw, "code": "invalid_id" }))
    })
}

fn parse_create_request(payload: CreateListingRequest) -> Result<ListingDraft, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error("name"))?;
    let area = payload.area.ok_or_else(|| missing_field_error("area"))?;
    let bedrooms = payload
        .bedrooms
        .ok_or_else(|| missing_field_error("bedrooms"))?;
    let features = payload
        .features
        .ok_or_else(|| missing_field_error("features"))?;
    let kind = payload.kind.ok_or_else(|| missing_field_error("type"))?;

    Ok(ListingDraft {
        name,
        area: area.into_text(),
        bedrooms,
        features,
        kind: parse_kind(&kind)?,
        description: payload.description,
        offer: payload.offer.unwrap_or(false),
        furnished: payload.furnished.unwrap_or(false),
        parking: payload.parking.unwrap_or(false),
    })
}

fn parse_update_request(payload: UpdateListingRequest) -> Result<ListingPatch, Error> {
    let kind = payload.kind.as_deref().map(parse_kind).transpose()?;
    Ok(ListingPatch {
        name: payload.name,
        area: payload.area.map(AreaValue::into_text),
        bedrooms: payload.bedrooms,
        features: payload.features,
        kind,
        description: payload.description,
        offer: payload.offer,
        furnished: payload.furnished,
        parking: payload.parking,
    })
}

fn parse_search_params(params: SearchParams) -> Result<SearchRequest, Error> {
    let filter = ListingFilter {
        tokens: SearchTokens::tokenize(params.search_term.as_deref().unwrap_or("")),
        offer: TriState::from_param(params.offer.as_deref()),
        furnished: TriState::from_param(params.furnished.as_deref()),
        parking: TriState::from_param(params.parking.as_deref()),
        kind: KindFilter::from_param(params.kind.as_deref()).map_err(map_unknown_param)?,
    };
    let sort = Sort {
        field: SortField::from_param(params.sort.as_deref()).map_err(map_unknown_param)?,
        order: SortOrder::from_param(params.order.as_deref()).map_err(map_unknown_param)?,
    };

    Ok(SearchRequest {
        filter,
        sort,
        limit: params.limit.and_then(|raw| raw.parse().ok()),
        start_index: params.start_index.and_then(|raw| raw.parse().ok()),
    })
}

/// Create a listing owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store or completion API unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateListingRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = parse_create_request(payload.into_inner())?;
    let listing = state.commands.create(owner, draft).await?;
    Ok(HttpResponse::Created().json(ListingResponse::from(listing)))
}

/// Fetch a single listing; no authentication required.
#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing", body = ListingResponse),
        (status = 400, description = "Invalid identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Listing not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security([])
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingResponse>> {
    let id = parse_listing_id(&path)?;
    let listing = state.queries.get(id).await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Search listings with filters, sorting, and pagination.
#[utoipa::path(
    get,
    path = "/api/listings",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 9"),
        ("startIndex" = Option<i64>, Query, description = "Records to skip, default 0"),
        ("searchTerm" = Option<String>, Query, description = "Free-text term matched against name and description"),
        ("sort" = Option<String>, Query, description = "createdAt | name | bedrooms"),
        ("order" = Option<String>, Query, description = "asc | desc"),
        ("offer" = Option<String>, Query, description = "\"true\" to constrain; anything else matches both"),
        ("furnished" = Option<String>, Query, description = "\"true\" to constrain; anything else matches both"),
        ("parking" = Option<String>, Query, description = "\"true\" to constrain; anything else matches both"),
        ("type" = Option<String>, Query, description = "sale | rent | all")
    ),
    responses(
        (status = 200, description = "Matching listings, windowed", body = [ListingResponse]),
        (status = 400, description = "Invalid parameter", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "searchListings",
    security([])
)]
#[get("/listings")]
pub async fn search_listings(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<ListingResponse>>> {
    let request = parse_search_params(params.into_inner())?;
    let listings = state.queries.search(request).await?;
    Ok(web::Json(
        listings.into_iter().map(ListingResponse::from).collect(),
    ))
}

/// Update a listing the authenticated user owns.
#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingResponse),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Listing not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing"
)]
#[put("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateListingRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    let acting_user = session.require_user_id()?;
    let id = parse_listing_id(&path)?;
    let patch = parse_update_request(payload.into_inner())?;
    let listing = state.commands.update(id, acting_user, patch).await?;
    Ok(web::Json(ListingResponse::from(listing)))
}

/// Delete a listing the authenticated user owns.
#[utoipa::path(
    delete,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing deleted"),
        (status = 400, description = "Invalid identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Not the owner", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Listing not found", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "deleteListing"
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let id = parse_listing_id(&path)?;
    state.commands.delete(id, acting_user).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Listing has been deleted!" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixtureDescriptionGenerator;
    use crate::domain::{ListingService, SearchPolicy};
    use crate::inbound::http::users::{derive_user_id, login, LoginRequest};
    use crate::outbound::persistence::MemoryListingRepository;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn test_state() -> HttpState {
        let service = ListingService::with_policy(
            Arc::new(MemoryListingRepository::new()),
            Arc::new(FixtureDescriptionGenerator),
            SearchPolicy::default(),
        );
        HttpState::from_service(Arc::new(service))
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api")
                    .service(login)
                    .service(create_listing)
                    .service(search_listings)
                    .service(get_listing)
                    .service(update_listing)
                    .service(delete_listing),
            )
    }

    async fn login_as(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        username: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/login")
                .set_json(&LoginRequest {
                    username: username.into(),
                    password: "secret".into(),
                })
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    fn lakeview_body() -> Value {
        json!({
            "name": "Lakeview",
            "area": "140 sqm",
            "bedrooms": 3,
            "features": ["pool", "garage"],
            "type": "sale"
        })
    }

    async fn create(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
        body: Value,
    ) -> Value {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/listings")
                .cookie(cookie.clone())
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        actix_test::read_body_json(response).await
    }

    #[actix_web::test]
    async fn create_returns_201_with_owner_and_generated_description() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let cookie = login_as(&app, "alice").await;

        let created = create(&app, &cookie, lakeview_body()).await;

        assert_eq!(created["name"], "Lakeview");
        assert_eq!(created["bedrooms"], 3);
        assert_eq!(created["features"], json!(["pool", "garage"]));
        assert_eq!(created["type"], "sale");
        assert_eq!(
            created["owner"].as_str(),
            Some(derive_user_id("alice").to_string().as_str())
        );
        assert!(!created["description"]
            .as_str()
            .expect("description present")
            .is_empty());
        assert!(created["id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn create_without_a_session_is_unauthorised() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/listings")
                .set_json(&lakeview_body())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_reports_missing_fields_in_the_error_envelope() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let cookie = login_as(&app, "alice").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/listings")
                .cookie(cookie)
                .set_json(&json!({ "area": "90 sqm", "bedrooms": 2, "features": [], "type": "rent" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "name");
    }

    #[actix_web::test]
    async fn create_accepts_numeric_area() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let cookie = login_as(&app, "alice").await;
        let mut body = lakeview_body();
        body["area"] = json!(140);

        let created = create(&app, &cookie, body).await;
        assert_eq!(created["area"], "140");
    }

    #[actix_web::test]
    async fn a_second_user_cannot_delete_a_foreign_listing() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let alice = login_as(&app, "alice").await;
        let created = create(&app, &alice, lakeview_body()).await;
        let id = created["id"].as_str().expect("id");

        let bob = login_as(&app, "bob").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/listings/{id}"))
                .cookie(bob)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "You can only delete your own listings");

        // The listing is still retrievable afterwards.
        let fetched = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/listings/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(fetched.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn the_owner_can_delete_and_the_listing_disappears() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let alice = login_as(&app, "alice").await;
        let created = create(&app, &alice, lakeview_body()).await;
        let id = created["id"].as_str().expect("id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/listings/{id}"))
                .cookie(alice.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "Listing has been deleted!");

        let fetched = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/listings/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn mutations_on_an_unknown_id_are_not_found_never_forbidden() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let alice = login_as(&app, "alice").await;
        let missing = ListingId::random();

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/listings/{missing}"))
                .cookie(alice.clone())
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::NOT_FOUND);

        let updated = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/listings/{missing}"))
                .cookie(alice)
                .set_json(&json!({ "name": "Renamed" }))
                .to_request(),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(updated).await;
        assert_eq!(body["message"], "Listing not found");
    }

    #[actix_web::test]
    async fn update_merges_supplied_fields_and_ignores_owner_overrides() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let alice = login_as(&app, "alice").await;
        let created = create(&app, &alice, lakeview_body()).await;
        let id = created["id"].as_str().expect("id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/listings/{id}"))
                .cookie(alice)
                .set_json(&json!({
                    "name": "Lakeview Retreat",
                    "bedrooms": 4,
                    "owner": derive_user_id("mallory").to_string(),
                    "id": ListingId::random().to_string()
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["name"], "Lakeview Retreat");
        assert_eq!(body["bedrooms"], 4);
        assert_eq!(body["area"], created["area"]);
        assert_eq!(body["owner"], created["owner"]);
        assert_eq!(body["id"], created["id"]);
    }

    #[actix_web::test]
    async fn update_by_a_non_owner_is_forbidden() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let alice = login_as(&app, "alice").await;
        let created = create(&app, &alice, lakeview_body()).await;
        let id = created["id"].as_str().expect("id");

        let bob = login_as(&app, "bob").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/listings/{id}"))
                .cookie(bob)
                .set_json(&json!({ "name": "Taken over" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    async fn seed_for_search(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) {
        let cookie = login_as(app, "alice").await;
        let seeds = [
            ("Cozy Loft Downtown", "rent", false, false),
            ("Harbour View Flat", "rent", true, false),
            ("Lakeview Villa", "sale", false, true),
            ("Garden Cottage", "sale", true, true),
            ("Skyline Penthouse", "sale", false, false),
        ];
        for (name, kind, offer, furnished) in seeds {
            create(
                app,
                &cookie,
                json!({
                    "name": name,
                    "area": "100 sqm",
                    "bedrooms": 2,
                    "features": ["balcony"],
                    "type": kind,
                    "description": format!("{name} with plenty of light."),
                    "offer": offer,
                    "furnished": furnished
                }),
            )
            .await;
        }
    }

    async fn search_names(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        query: &str,
    ) -> Vec<String> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/listings{query}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        body.as_array()
            .expect("array body")
            .iter()
            .map(|item| item["name"].as_str().expect("name").to_owned())
            .collect()
    }

    #[actix_web::test]
    async fn search_defaults_to_newest_first_with_page_size_nine() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        let names = search_names(&app, "").await;
        assert_eq!(
            names,
            vec![
                "Skyline Penthouse",
                "Garden Cottage",
                "Lakeview Villa",
                "Harbour View Flat",
                "Cozy Loft Downtown",
            ]
        );
    }

    #[actix_web::test]
    async fn search_windows_with_limit_and_start_index() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        // Skip the two most recent; take the 3rd and 4th most recent.
        let names = search_names(&app, "?limit=2&startIndex=2").await;
        assert_eq!(names, vec!["Lakeview Villa", "Harbour View Flat"]);
    }

    #[actix_web::test]
    async fn search_type_filter_distinguishes_sale_from_all() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        let all = search_names(&app, "?type=all").await;
        assert_eq!(all.len(), 5);

        let sale = search_names(&app, "?type=sale").await;
        assert_eq!(
            sale,
            vec!["Skyline Penthouse", "Garden Cottage", "Lakeview Villa"]
        );
    }

    #[actix_web::test]
    async fn search_offer_tristate_constrains_only_on_true() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        let unset = search_names(&app, "").await;
        assert_eq!(unset.len(), 5);

        let only_offers = search_names(&app, "?offer=true").await;
        assert_eq!(only_offers, vec!["Garden Cottage", "Harbour View Flat"]);

        // Anything other than the literal "true" leaves the filter open.
        let not_constrained = search_names(&app, "?offer=false").await;
        assert_eq!(not_constrained.len(), 5);
    }

    #[actix_web::test]
    async fn search_term_matches_case_insensitively() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        let names = search_names(&app, "?searchTerm=cozy%20loft").await;
        assert_eq!(names, vec!["Cozy Loft Downtown"]);
    }

    #[actix_web::test]
    async fn search_sorts_by_name_ascending_on_request() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        let names = search_names(&app, "?sort=name&order=asc").await;
        assert_eq!(
            names,
            vec![
                "Cozy Loft Downtown",
                "Garden Cottage",
                "Harbour View Flat",
                "Lakeview Villa",
                "Skyline Penthouse",
            ]
        );
    }

    #[actix_web::test]
    async fn search_rejects_unknown_sort_fields() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/listings?sort=owner")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "sort");
    }

    #[actix_web::test]
    async fn search_tolerates_garbage_pagination_values() {
        let app = actix_test::init_service(test_app(test_state())).await;
        seed_for_search(&app).await;

        let names = search_names(&app, "?limit=abc&startIndex=xyz").await;
        assert_eq!(names.len(), 5);
    }

    #[actix_web::test]
    async fn invalid_listing_ids_are_rejected_up_front() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/listings/not-a-uuid")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
