use actix_web::{
    delete, get,
    http::header,
    post,
    web::{self, Data},
    HttpRequest, HttpResponse,
};
use people_store::{
    consts::consts::DEFAULT_PAGE_SIZE,
    model::{
        id::PersonId,
        person::{NewPerson, Person},
    },
    repository::person::PersonRepository,
    store::query::PageRequest,
};
use serde::Deserialize;

use crate::error::ApiError;

/// Registers the people routes together with body and query decoding rules
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(|err, _req| {
                log::warn!("Unable to decode person payload: {}", err);
                ApiError::BadRequest(err.to_string()).into()
            }),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        log::warn!("Unable to decode list query: {}", err);
        ApiError::BadRequest(err.to_string()).into()
    }))
    .service(list_people)
    .service(get_person)
    .service(create_person)
    .service(delete_person);
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Deserialize, Debug)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    limit: u32,
    after: Option<String>,
}

impl ListQuery {
    fn to_page_request(&self) -> Result<PageRequest, ApiError> {
        let page =
            PageRequest::first(self.limit).map_err(|e| ApiError::BadRequest(e.to_string()))?;

        match &self.after {
            Some(after) => {
                let after: PersonId = after
                    .parse()
                    .map_err(|e| ApiError::BadRequest(format!("{}", e)))?;

                Ok(page.starting_after(after.into()))
            }
            None => Ok(page),
        }
    }
}

/// One page of people, ascending by id. Resume with `after=<last id>`.
#[get("/people")]
async fn list_people(
    repository: Data<PersonRepository>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = query.to_page_request()?;

    let people: Vec<Person> = repository.find_all(page).await?;

    Ok(HttpResponse::Ok().json(people))
}

#[get("/people/{id}")]
async fn get_person(
    repository: Data<PersonRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    let person = repository.find_by_id(&id).await?;

    match person {
        Some(person) => Ok(HttpResponse::Ok().json(person)),
        None => Err(ApiError::NotFound(id)),
    }
}

/// Creates a person unless one with the same first and last name exists, in which case
/// the response is `302 Found` and nothing is inserted.
#[post("/people")]
async fn create_person(
    req: HttpRequest,
    repository: Data<PersonRepository>,
    person: web::Json<NewPerson>,
) -> Result<HttpResponse, ApiError> {
    let person = person.into_inner();

    let existing = repository
        .find_by_fields(person.firstname.as_deref(), person.lastname.as_deref())
        .await?;

    if let Some(existing) = existing {
        log::debug!("Person already exists: {}", existing.id);
        return Ok(HttpResponse::Found().finish());
    }

    let id = repository.save(person).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location(&req, &id)))
        .finish())
}

#[delete("/people/{id}")]
async fn delete_person(
    repository: Data<PersonRepository>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    let person = repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.clone()))?;

    repository.delete(&person).await?;

    Ok(HttpResponse::NoContent().finish())
}

// Built from the Host header and the listener's own scheme, forwarding headers are
//  client controlled and ignored
fn location(req: &HttpRequest, id: &PersonId) -> String {
    let app_config = req.app_config();

    let scheme = if app_config.secure() { "https" } else { "http" };

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .or_else(|| req.uri().authority().map(|authority| authority.as_str()))
        .unwrap_or_else(|| app_config.host());

    format!(
        "{}://{}{}/{}",
        scheme,
        host,
        req.path().trim_end_matches('/'),
        id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cors::cors;
    use actix_web::{
        http::{Method, StatusCode},
        middleware::NormalizePath,
        test, App,
    };
    use actix_web_lab::middleware::from_fn;
    use people_store::{
        repository::seed::demo_people,
        store::{memory::MemoryStore, DocumentStore},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;

    macro_rules! people_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new(PersonRepository::new($store)))
                    .configure(configure)
                    .wrap(NormalizePath::trim())
                    .wrap(from_fn(cors)),
            )
            .await
        };
    }

    fn location_path(location: &str) -> String {
        let without_scheme = location
            .split_once("://")
            .map(|(_, rest)| rest)
            .expect("absolute location");

        without_scheme[without_scheme.find('/').expect("has path")..].to_string()
    }

    #[actix_web::test]
    async fn create_get_delete_round_trip() {
        // Given an empty store
        let store = Arc::new(MemoryStore::new());
        let app = people_app!(store.clone());

        // When a person is created
        let req = test::TestRequest::post()
            .uri("/people")
            .set_json(json!({ "firstname": "A", "lastname": "B" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        // Then the response is 201 with a Location ending in the generated id
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res
            .headers()
            .get(header::LOCATION)
            .expect("location header")
            .to_str()
            .unwrap()
            .to_string();
        assert!(location.starts_with("http://"));
        let path = location_path(&location);
        let id = path.trim_start_matches("/people/").to_string();
        assert!(id.parse::<PersonId>().is_ok());
        assert_eq!(test::read_body(res).await.len(), 0);

        // And the person can be read back
        let res = test::call_service(&app, test::TestRequest::get().uri(&path).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "id": id, "firstname": "A", "lastname": "B" }));

        // And deleted
        let res =
            test::call_service(&app, test::TestRequest::delete().uri(&path).to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        // After which it is gone
        let res = test::call_service(&app, test::TestRequest::get().uri(&path).to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.document_count(), 0);
    }

    #[actix_web::test]
    async fn location_ignores_forwarding_headers() {
        let app = people_app!(Arc::new(MemoryStore::new()));

        // Given a create request carrying forwarding headers
        let req = test::TestRequest::post()
            .uri("/people")
            .insert_header((header::HOST, "api.example"))
            .insert_header(("x-forwarded-host", "evil.example"))
            .insert_header(("x-forwarded-proto", "javascript"))
            .insert_header((header::FORWARDED, "host=evil.example;proto=javascript"))
            .set_json(json!({ "firstname": "A", "lastname": "B" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        // Then the location is built from the Host header and the plain http listener
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(
            location.starts_with("http://api.example/people/"),
            "{}",
            location
        );
    }

    #[actix_web::test]
    async fn create_keeps_the_address_and_ignores_client_id() {
        let store = Arc::new(MemoryStore::new());
        let app = people_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/people")
            .set_json(json!({
                "id": "507f1f77bcf86cd799439011",
                "firstname": "Rafika",
                "lastname": "ICHIR",
                "address": { "city": "France", "state": "Paris" }
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let path = location_path(res.headers().get(header::LOCATION).unwrap().to_str().unwrap());
        assert_ne!(path, "/people/507f1f77bcf86cd799439011");

        let res = test::call_service(&app, test::TestRequest::get().uri(&path).to_request()).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["address"], json!({ "city": "France", "state": "Paris" }));
    }

    #[actix_web::test]
    async fn duplicate_names_are_not_inserted() {
        // Given a person already stored
        let store = Arc::new(MemoryStore::new());
        let app = people_app!(store.clone());
        let payload = json!({ "firstname": "A", "lastname": "B" });
        let req = test::TestRequest::post()
            .uri("/people")
            .set_json(&payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        // When the same names are posted again
        let req = test::TestRequest::post()
            .uri("/people")
            .set_json(&payload)
            .to_request();
        let res = test::call_service(&app, req).await;

        // Then the response is 302 and the document count is unchanged
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(store.document_count(), 1);
    }

    #[actix_web::test]
    async fn malformed_ids_are_not_found() {
        let app = people_app!(Arc::new(MemoryStore::new()));

        for method in [Method::GET, Method::DELETE] {
            let req = test::TestRequest::default()
                .method(method)
                .uri("/people/not-an-id")
                .to_request();
            let res = test::call_service(&app, req).await;

            assert_eq!(res.status(), StatusCode::NOT_FOUND);
        }
    }

    #[actix_web::test]
    async fn unknown_ids_are_not_found() {
        let app = people_app!(Arc::new(MemoryStore::new()));
        let uri = format!("/people/{}", PersonId::generate());

        let get = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        let delete =
            test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;

        assert_eq!(get.status(), StatusCode::NOT_FOUND);
        assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn undecodable_body_is_a_bad_request() {
        let store = Arc::new(MemoryStore::new());
        let app = people_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/people")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.document_count(), 0);
    }

    #[actix_web::test]
    async fn list_pages_through_people() {
        // Given the two demo people
        let store = Arc::new(MemoryStore::new());
        PersonRepository::new(store.clone())
            .seed(&demo_people())
            .await
            .expect("should seed");
        let app = people_app!(store.clone());

        // When listing with the default page size
        let res = test::call_service(&app, test::TestRequest::get().uri("/people").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let all: Vec<Person> = test::read_body_json(res).await;
        assert_eq!(all.len(), 2);

        // And page by page
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/people?limit=1").to_request(),
        )
        .await;
        let first: Vec<Person> = test::read_body_json(res).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/people?limit=1&after={}", first[0].id))
                .to_request(),
        )
        .await;
        let second: Vec<Person> = test::read_body_json(res).await;

        // Then the pages together are the full list
        assert_eq!(vec![first[0].clone(), second[0].clone()], all);
    }

    #[actix_web::test]
    async fn list_rejects_bad_paging_parameters() {
        let app = people_app!(Arc::new(MemoryStore::new()));

        for uri in [
            "/people?limit=0",
            "/people?limit=1000",
            "/people?limit=abc",
            "/people?after=nope",
        ] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn trailing_slash_is_tolerated() {
        let app = people_app!(Arc::new(MemoryStore::new()));

        let res = test::call_service(&app, test::TestRequest::get().uri("/people/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn options_has_no_side_effects() {
        // Given a store with one person
        let store = Arc::new(MemoryStore::new());
        let id = PersonRepository::new(store.clone())
            .save(NewPerson::new("A", "B", None))
            .await
            .unwrap();
        let app = people_app!(store.clone());

        // When OPTIONS is sent to every route
        for uri in ["/people".to_string(), format!("/people/{}", id)] {
            let req = test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri(&uri)
                .insert_header((header::ORIGIN, "http://client.example"))
                .to_request();
            let res = test::call_service(&app, req).await;

            // Then only headers come back
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(
                res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
                "http://client.example"
            );
            assert_eq!(test::read_body(res).await.len(), 0);
        }

        // And the stored person is untouched
        assert_eq!(store.document_count(), 1);
        assert!(store.find_by_id(&id.0).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn store_failures_are_internal_errors() {
        // Given a store that has been closed underneath the app
        let store = Arc::new(MemoryStore::new());
        let app = people_app!(store.clone());
        store.close().await;

        // When a person is created
        let req = test::TestRequest::post()
            .uri("/people")
            .set_json(json!({ "firstname": "A", "lastname": "B" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        // Then the failure surfaces as a 500 with cors headers still set
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
