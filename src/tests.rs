#[cfg(test)]
mod integration_tests {
    use crate::test_utils::test_utils::{
        admin_auth, basic_auth, registration_body, setup_test_app, update_body, user_auth,
        ADMIN_EMAIL,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    /// Registers `username` and returns the created regular user.
    async fn register(server: &TestServer, username: &str, name: &str) -> Value {
        let response = server
            .post("/regularuser")
            .json(&registration_body(username, name))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    async fn create_chef(server: &TestServer, username: &str) -> Value {
        let (header, value) = admin_auth();
        let response = server
            .post("/chef")
            .add_header(header, value)
            .json(&registration_body(username, "Gordon"))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    async fn create_allergen(server: &TestServer, name: &str) -> Value {
        let (header, value) = admin_auth();
        let response = server
            .post("/allergens")
            .add_header(header, value)
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    fn id_of(value: &Value) -> i64 {
        value["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_register_regular_user() {
        let server = server().await;

        let created = register(&server, "ana", "Ana").await;

        assert_eq!(created["username"], "ana");
        assert_eq!(created["role"], "REGULAR_USER");
        assert!(created["my_cook_book_id"].as_i64().is_some());
        assert_eq!(created["allergens"], json!([]));
        assert!(created.get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_with_invalid_form() {
        let server = server().await;

        let mut body = registration_body("ana", "Ana");
        body["email"] = json!("not-an-email");
        body["confirmed_password"] = json!("different");
        let response = server.post("/regularuser").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error = response.json::<Value>();
        assert_eq!(error["code"], 1);
        assert!(error["errors"]["email"].is_array());
        assert_eq!(error["errors"]["confirmed_password"][0], "Passwords must be the same.");
    }

    #[tokio::test]
    async fn test_register_missing_field() {
        let server = server().await;

        let mut body = registration_body("ana", "Ana");
        body.as_object_mut().unwrap().remove("lastname");
        let response = server.post("/regularuser").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["errors"]["lastname"].is_array());
    }

    #[tokio::test]
    async fn test_register_conflicts() {
        let server = server().await;
        register(&server, "ana", "Ana").await;

        // Same email, different username
        let mut same_email = registration_body("other", "Ana");
        same_email["email"] = json!("ana@example.com");
        let response = server.post("/regularuser").json(&same_email).await;
        response.assert_status(StatusCode::CONFLICT);
        let error = response.json::<Value>();
        assert_eq!(error["code"], 1);
        assert_eq!(error["message"], "Email already exists");

        // Same username, different email
        let mut same_username = registration_body("ana", "Ana");
        same_username["email"] = json!("fresh@example.com");
        let response = server.post("/regularuser").json(&same_username).await;
        response.assert_status(StatusCode::CONFLICT);
        let error = response.json::<Value>();
        assert_eq!(error["code"], 2);
        assert_eq!(error["message"], "Username already exists");
    }

    #[tokio::test]
    async fn test_get_all_regular_users() {
        let server = server().await;
        let (header, value) = admin_auth();

        let empty = server.get("/regularuser").add_header(header.clone(), value.clone()).await;
        empty.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(empty.json::<Value>()["code"], 1);

        register(&server, "ana", "Ana").await;
        register(&server, "bob", "Bob").await;

        let response = server.get("/regularuser").add_header(header, value).await;
        response.assert_status(StatusCode::OK);
        let users = response.json::<Vec<Value>>();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["username"], "ana");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_other_callers() {
        let server = server().await;
        register(&server, "ana", "Ana").await;

        let anonymous = server.get("/regularuser").await;
        anonymous.assert_status(StatusCode::UNAUTHORIZED);

        let (header, value) = user_auth("ana");
        let regular = server.get("/regularuser").add_header(header, value).await;
        regular.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(regular.json::<Value>()["code"], 2);

        let (header, value) = basic_auth(ADMIN_EMAIL, "wrong-password");
        let wrong_password = server.get("/regularuser").add_header(header, value).await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_regular_user_by_id_and_name() {
        let server = server().await;
        let first = register(&server, "ana", "Ana").await;
        register(&server, "ana2", "Ana").await;
        let (header, value) = admin_auth();

        let by_id = server
            .get(&format!("/regularuser/{}", id_of(&first)))
            .add_header(header.clone(), value.clone())
            .await;
        by_id.assert_status(StatusCode::OK);
        assert_eq!(by_id.json::<Value>()["username"], "ana");

        let by_name = server
            .get("/regularuser/by_name")
            .add_query_param("name", "Ana")
            .add_header(header.clone(), value.clone())
            .await;
        by_name.assert_status(StatusCode::OK);
        assert_eq!(id_of(&by_name.json::<Value>()), id_of(&first));

        let missing = server
            .get("/regularuser/by_name")
            .add_query_param("name", "Nobody")
            .add_header(header.clone(), value.clone())
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);

        let unknown_id = server.get("/regularuser/999").add_header(header, value).await;
        unknown_id.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_by_name_requires_name() {
        let server = server().await;
        let (header, value) = admin_auth();

        let response = server.get("/regularuser/by_name").add_header(header, value).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], 1);
        assert!(body["errors"]["query"].is_array());
    }

    #[tokio::test]
    async fn test_by_name_rejects_empty_name() {
        let server = server().await;
        let (header, value) = admin_auth();

        let response = server
            .get("/recipe/by_name")
            .add_header(header, value)
            .add_query_param("name", "")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], 1);
        assert!(body["errors"]["name"].is_array());
    }

    #[tokio::test]
    async fn test_update_with_missing_fields_is_validation_error() {
        let server = server().await;
        let ana = register(&server, "ana", "Ana").await;
        let (header, value) = user_auth("ana");

        let response = server
            .put(&format!("/regularuser/{}", id_of(&ana)))
            .add_header(header, value)
            .json(&json!({ "name": "Anna" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], 1);
        assert!(body["errors"]["body"].is_array());
    }

    #[tokio::test]
    async fn test_register_with_wrong_field_type_is_validation_error() {
        let server = server().await;
        let mut form = registration_body("ana", "Ana");
        form["username"] = json!(5);

        let response = server.post("/regularuser").json(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], 1);
        assert!(body["errors"]["body"].is_array());
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_validation_error() {
        let server = server().await;
        let (header, value) = admin_auth();

        let response = server.get("/regularuser/abc").add_header(header, value).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], 1);
        assert!(body["errors"]["path"].is_array());
    }

    #[tokio::test]
    async fn test_regular_user_updates_own_profile_only() {
        let server = server().await;
        let ana = register(&server, "ana", "Ana").await;
        let bob = register(&server, "bob", "Bob").await;
        let (header, value) = user_auth("ana");

        let own = server
            .put(&format!("/regularuser/{}", id_of(&ana)))
            .add_header(header.clone(), value.clone())
            .json(&update_body("ana", "Anna"))
            .await;
        own.assert_status(StatusCode::OK);
        let updated = own.json::<Value>();
        assert_eq!(updated["name"], "Anna");
        assert_eq!(updated["my_cook_book_id"], ana["my_cook_book_id"]);

        let other = server
            .put(&format!("/regularuser/{}", id_of(&bob)))
            .add_header(header, value)
            .json(&update_body("bob", "Hijacked"))
            .await;
        other.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_updates_any_regular_user() {
        let server = server().await;
        let bob = register(&server, "bob", "Bob").await;
        let (header, value) = admin_auth();

        let response = server
            .put(&format!("/regularuser/{}", id_of(&bob)))
            .add_header(header.clone(), value.clone())
            .json(&update_body("bobby", "Bobby"))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Value>()["username"], "bobby");

        let missing = server
            .put("/regularuser/999")
            .add_header(header, value)
            .json(&update_body("ghost", "Ghost"))
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chef_cannot_use_regular_user_update() {
        let server = server().await;
        let chef = create_chef(&server, "gordon").await;
        let (header, value) = user_auth("gordon");

        let response = server
            .put(&format!("/regularuser/{}", id_of(&chef)))
            .add_header(header, value)
            .json(&update_body("gordon", "Gordon"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_allergen_association() {
        let server = server().await;
        let ana = register(&server, "ana", "Ana").await;
        let gluten = create_allergen(&server, "Gluten").await;
        let nuts = create_allergen(&server, "Nuts").await;
        let (header, value) = user_auth("ana");

        let add = |allergen: &Value| {
            format!(
                "/regularuser/regularuser_id/{}/allergen_id/{}",
                id_of(&ana),
                id_of(allergen)
            )
        };

        server.put(&add(&gluten)).add_header(header.clone(), value.clone()).await
            .assert_status(StatusCode::CREATED);
        server.put(&add(&nuts)).add_header(header.clone(), value.clone()).await
            .assert_status(StatusCode::CREATED);
        let twice = server.put(&add(&gluten)).add_header(header.clone(), value.clone()).await;
        twice.assert_status(StatusCode::CREATED);
        assert_eq!(twice.json::<Value>()["allergens"].as_array().unwrap().len(), 3);

        let remove = server
            .put(&format!(
                "/regularuser/delete/regularuser_id/{}/allergen_id/{}",
                id_of(&ana),
                id_of(&gluten)
            ))
            .add_header(header, value)
            .await;
        remove.assert_status(StatusCode::CREATED);
        let names: Vec<String> = remove.json::<Value>()["allergens"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Nuts", "Gluten"]);
    }

    #[tokio::test]
    async fn test_allergen_association_errors() {
        let server = server().await;
        let ana = register(&server, "ana", "Ana").await;
        let gluten = create_allergen(&server, "Gluten").await;

        let (header, value) = user_auth("ana");
        let unknown_allergen = server
            .put(&format!("/regularuser/regularuser_id/{}/allergen_id/999", id_of(&ana)))
            .add_header(header.clone(), value.clone())
            .await;
        unknown_allergen.assert_status(StatusCode::NOT_FOUND);

        let unknown_user = server
            .put(&format!("/regularuser/regularuser_id/999/allergen_id/{}", id_of(&gluten)))
            .add_header(header, value)
            .await;
        unknown_user.assert_status(StatusCode::NOT_FOUND);

        create_chef(&server, "gordon").await;
        let (header, value) = user_auth("gordon");
        let as_chef = server
            .put(&format!(
                "/regularuser/regularuser_id/{}/allergen_id/{}",
                id_of(&ana),
                id_of(&gluten)
            ))
            .add_header(header, value)
            .await;
        as_chef.assert_status(StatusCode::UNAUTHORIZED);

        let (header, value) = admin_auth();
        let as_admin = server
            .put(&format!(
                "/regularuser/regularuser_id/{}/allergen_id/{}",
                id_of(&ana),
                id_of(&gluten)
            ))
            .add_header(header, value)
            .await;
        as_admin.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_delete_regular_user() {
        let server = server().await;
        let ana = register(&server, "ana", "Ana").await;
        let (header, value) = admin_auth();
        let path = format!("/regularuser/{}", id_of(&ana));

        let response = server.delete(&path).add_header(header.clone(), value.clone()).await;
        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.json::<Value>()["message"],
            format!("Regular user with ID {} has been successfully deleted.", id_of(&ana))
        );

        server.get(&path).add_header(header.clone(), value.clone()).await
            .assert_status(StatusCode::NOT_FOUND);
        server.delete(&path).add_header(header, value).await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_allergens_are_public_to_read() {
        let server = server().await;
        let gluten = create_allergen(&server, "Gluten").await;

        let list = server.get("/allergens").await;
        list.assert_status(StatusCode::OK);
        assert_eq!(list.json::<Vec<Value>>().len(), 1);

        let single = server.get(&format!("/allergens/{}", id_of(&gluten))).await;
        single.assert_status(StatusCode::OK);
        assert_eq!(single.json::<Value>()["name"], "Gluten");

        server.get("/allergens/999").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_allergen_name() {
        let server = server().await;
        create_allergen(&server, "Gluten").await;
        let (header, value) = admin_auth();

        let response = server
            .post("/allergens")
            .add_header(header, value)
            .json(&json!({ "name": "Gluten" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["code"], 3);
    }

    #[tokio::test]
    async fn test_chef_lifecycle() {
        let server = server().await;
        let chef = create_chef(&server, "gordon").await;
        assert_eq!(chef["role"], "CHEF");
        assert_eq!(chef["recipes"], json!([]));

        // Chef publishes recipes
        let (chef_header, chef_value) = user_auth("gordon");
        for name in ["Risotto", "Soup"] {
            server
                .post("/recipe")
                .add_header(chef_header.clone(), chef_value.clone())
                .json(&json!({ "name": name, "description": "Classic" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let duplicate = server
            .post("/recipe")
            .add_header(chef_header.clone(), chef_value.clone())
            .json(&json!({ "name": "Soup" }))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
        assert_eq!(duplicate.json::<Value>()["code"], 3);

        // Any authenticated user may browse recipes
        register(&server, "ana", "Ana").await;
        let (header, value) = user_auth("ana");
        let recipes = server
            .get(&format!("/chef/{}/recipes", id_of(&chef)))
            .add_header(header.clone(), value.clone())
            .await;
        recipes.assert_status(StatusCode::OK);
        let recipes = recipes.json::<Vec<Value>>();
        assert_eq!(recipes.len(), 2);

        let by_name = server
            .get("/recipe/by_name")
            .add_query_param("name", "Risotto")
            .add_header(header, value)
            .await;
        by_name.assert_status(StatusCode::OK);
        assert_eq!(by_name.json::<Value>()["chef_id"], chef["id"]);

        // Admin keeps only the first recipe
        let (admin_header, admin_value) = admin_auth();
        let mut body = update_body("gordon", "Gordon");
        body["recipe_ids"] = json!([recipes[0]["id"]]);
        let updated = server
            .put(&format!("/chef/{}", id_of(&chef)))
            .add_header(admin_header.clone(), admin_value.clone())
            .json(&body)
            .await;
        updated.assert_status(StatusCode::OK);
        assert_eq!(updated.json::<Value>()["recipes"].as_array().unwrap().len(), 1);

        // Deleting the chef
        server
            .delete(&format!("/chef/{}", id_of(&chef)))
            .add_header(admin_header.clone(), admin_value.clone())
            .await
            .assert_status(StatusCode::OK);
        server
            .get("/chef")
            .add_header(admin_header, admin_value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_only_chefs_publish_recipes() {
        let server = server().await;
        register(&server, "ana", "Ana").await;
        let (header, value) = user_auth("ana");

        let response = server
            .post("/recipe")
            .add_header(header, value)
            .json(&json!({ "name": "Pancakes" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_chef_updates_own_profile() {
        let server = server().await;
        let gordon = create_chef(&server, "gordon").await;
        let jamie = create_chef(&server, "jamie").await;
        let (header, value) = user_auth("gordon");

        let own = server
            .put(&format!("/chef/{}", id_of(&gordon)))
            .add_header(header.clone(), value.clone())
            .json(&update_body("gordon", "Gordy"))
            .await;
        own.assert_status(StatusCode::OK);
        assert_eq!(own.json::<Value>()["name"], "Gordy");

        let other = server
            .put(&format!("/chef/{}", id_of(&jamie)))
            .add_header(header, value)
            .json(&update_body("jamie", "Jim"))
            .await;
        other.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_only_admins_create_chefs() {
        let server = server().await;
        register(&server, "ana", "Ana").await;
        let (header, value) = user_auth("ana");

        let response = server
            .post("/chef")
            .add_header(header, value)
            .json(&registration_body("gordon", "Gordon"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let server = server().await;

        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status(StatusCode::OK);
        let document = response.json::<Value>();
        assert!(document["paths"]["/regularuser"].is_object());
    }
}
