use swg_core::Severity;
use swg_core::ir::{DefinitionEntry, HttpMethod};
use swg_core::parse;
use swg_core::pipeline::{Normalized, normalize};
use swg_core::transform::PathOptions;

const PETSTORE_V2: &str = include_str!("fixtures/petstore-v2.yaml");
const PETSTORE_V3: &str = include_str!("fixtures/petstore-v3.yaml");

fn normalized(source: &str) -> Normalized {
    let doc = parse::from_yaml(source).unwrap();
    normalize(&doc, &PathOptions::default()).unwrap()
}

#[test]
fn resolving_twice_is_identical() {
    let first = normalized(PETSTORE_V2);
    let second = normalized(PETSTORE_V2);

    assert_eq!(first.definitions, second.definitions);
    assert_eq!(first.operations, second.operations);
    assert_eq!(
        serde_json::to_string(&first.definitions).unwrap(),
        serde_json::to_string(&second.definitions).unwrap()
    );
    assert_eq!(
        first.operations.names().collect::<Vec<_>>(),
        second.operations.names().collect::<Vec<_>>()
    );
}

#[test]
fn definitions_keep_document_order_with_children_after_parent() {
    let ir = normalized(PETSTORE_V2).definitions;
    let names: Vec<_> = ir.names().collect();
    assert_eq!(
        names,
        [
            "Pet",
            "PetOwner",
            "PetOwnerAddress",
            "Category",
            "Tag",
            "ApiResponse",
            "User",
            "Order",
            "Page<T>",
            "Wrapper<T>",
            "OrderStatus",
            "Labels",
        ]
    );
}

#[test]
fn generic_definition_is_flattened() {
    let ir = normalized(PETSTORE_V2).definitions;
    let props = ir.get("Page<T>").unwrap().properties();

    let content = &props[0];
    assert_eq!(content.name, "content");
    assert_eq!(content.type_name, "Array<T>");
    assert_eq!(content.ref_name, "User");

    let owner = &props[1];
    assert_eq!(owner.type_name, "T");
    assert_eq!(owner.ref_name, "User");

    let last_order = &props[2];
    assert_eq!(last_order.type_name, "Order");
    assert_eq!(last_order.ref_name, "Order");

    assert_eq!(props[3].type_name, "integer");
    assert_eq!(props[3].format, "int64");
}

#[test]
fn repeated_generic_base_collapses_to_first() {
    let ir = normalized(PETSTORE_V2).definitions;
    assert_eq!(ir.names().filter(|n| n.starts_with("Wrapper")).count(), 1);

    let props = ir.get("Wrapper<T>").unwrap().properties();
    assert_eq!(props.len(), 1, "Wrapper«B» adds nothing");
    assert_eq!(props[0].ref_name, "A");
}

#[test]
fn pet_properties() {
    let ir = normalized(PETSTORE_V2).definitions;
    let props = ir.get("Pet").unwrap().properties();
    let by_name = |name: &str| props.iter().find(|p| p.name == name).unwrap();

    assert!(by_name("name").required);
    assert!(!by_name("id").required);
    assert_eq!(by_name("category").type_name, "Category");
    assert_eq!(by_name("tags").type_name, "Array<Tag>");
    assert_eq!(by_name("tags").ref_name, "Tag");

    let status = by_name("status");
    assert_eq!(status.type_name, "PetStatus");
    assert_eq!(status.enum_option.len(), 3);
    assert!(ir.get("PetStatus").is_none(), "inline enums get no entry");

    let owner = by_name("owner");
    assert_eq!(owner.type_name, "PetOwner");
    let children = owner.properties.as_ref().unwrap();
    assert_eq!(children[1].type_name, "PetOwnerAddress");
}

#[test]
fn enum_and_mismatched_definitions() {
    let result = normalized(PETSTORE_V2);

    match result.definitions.get("OrderStatus").unwrap() {
        DefinitionEntry::Scalar(prop) => {
            assert_eq!(prop.type_name, "string");
            assert_eq!(prop.enum_option.len(), 3);
        }
        other => panic!("expected scalar, got {other:?}"),
    }

    assert!(result.definitions.get("Labels").unwrap().properties().is_empty());
    let mismatch = result
        .diagnostics
        .with_severity(Severity::Error)
        .find(|d| d.subject == "Labels")
        .expect("type mismatch reported");
    assert!(mismatch.message.contains("array"));
}

#[test]
fn parameters_are_required_first() {
    let ops = normalized(PETSTORE_V2).operations;
    let search = ops.get("getSearch").unwrap();
    let names: Vec<_> = search.parameters.query.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["q", "sort", "status"]);

    let status = &search.parameters.query[2];
    assert_eq!(status.type_name, "Array<GetSearchStatus>");
    assert_eq!(status.enum_option.len(), 3);
}

#[test]
fn path_variable_names_use_conjunction() {
    let ops = normalized(PETSTORE_V2).operations;
    let names: Vec<_> = ops.names().collect();
    assert_eq!(
        names,
        [
            "addPet",
            "getSearch",
            "getPetByPetId",
            "deletePetByPetId",
            "postUploadImage",
            "getUserById",
            "getOrderByOrderId",
        ]
    );

    let user = ops.get("getUserById").unwrap();
    assert_eq!(user.url, "/user/{id}");
    assert_eq!(user.method, HttpMethod::Get);
    assert_eq!(user.response.type_name, "Page<Array<User>>");
    assert_eq!(user.response.ref_name, "Page");
}

#[test]
fn custom_conjunction() {
    let doc = parse::from_yaml(PETSTORE_V2).unwrap();
    let options = PathOptions {
        conjunction: "With".to_string(),
        ..PathOptions::default()
    };
    let ops = normalize(&doc, &options).unwrap().operations;
    assert!(ops.contains("getUserWithId"));
}

#[test]
fn untagged_operation_is_excluded() {
    let result = normalized(PETSTORE_V2);
    assert!(
        result
            .operations
            .iter()
            .all(|(_, op)| op.url != "/store/inventory")
    );
    assert!(result.diagnostics.mentions("/store/inventory"));
    assert!(
        result
            .diagnostics
            .with_severity(Severity::Error)
            .any(|d| d.subject == "GET /store/inventory")
    );
}

#[test]
fn tag_index_replaces_document_tags() {
    let doc = parse::from_yaml(PETSTORE_V2).unwrap();
    let options = PathOptions {
        tag_index: Some(0),
        ..PathOptions::default()
    };
    let result = normalize(&doc, &options).unwrap();
    let inventory = result
        .operations
        .iter()
        .find(|(_, op)| op.url == "/store/inventory")
        .map(|(_, op)| op)
        .expect("tagged from path segment");
    assert_eq!(inventory.tag, "store");
    assert_eq!(inventory.response.type_name, "Map<string, integer>");
    assert_eq!(result.operations.get("getUserById").unwrap().tag, "user");
}

#[test]
fn non_200_only_operation_is_kept() {
    let result = normalized(PETSTORE_V2);
    let order = result.operations.get("getOrderByOrderId").unwrap();
    assert!(order.response.type_name.is_empty());
    assert!(order.response.properties.is_empty());
    assert!(
        result
            .diagnostics
            .with_severity(Severity::Warning)
            .any(|d| d.subject == "GET /store/order/{orderId}")
    );
}

#[test]
fn swagger_body_form_and_header_parameters() {
    let ops = normalized(PETSTORE_V2).operations;

    let add = ops.get("addPet").unwrap();
    assert_eq!(add.parameters.body.len(), 1);
    assert_eq!(add.parameters.body[0].type_name, "Pet");
    assert!(add.parameters.body[0].required);
    assert_eq!(add.request_headers, ["application/json"]);

    let upload = ops.get("postUploadImage").unwrap();
    assert_eq!(upload.request_headers, ["multipart/form-data"]);
    let form: Vec<_> = upload
        .parameters
        .form_data
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_str()))
        .collect();
    assert_eq!(form, [("additionalMetadata", "string"), ("file", "file")]);

    let delete = ops.get("deletePetByPetId").unwrap();
    assert!(delete.deprecated);
    assert_eq!(delete.parameters.path[0].name, "petId");
    assert_eq!(delete.parameters.path[0].format, "int64");
    assert_eq!(delete.parameters.header[0].name, "api_key");
}

#[test]
fn request_body_becomes_body_entry() {
    let ops = normalized(PETSTORE_V3).operations;

    let create = ops.get("postPets").unwrap();
    let body: Vec<_> = create.parameters.body.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(body, ["pet"], "one entry for both media types");
    assert_eq!(create.parameters.body[0].type_name, "Pet");
    assert!(create.parameters.body[0].required);
    assert_eq!(create.request_headers, ["application/json", "application/xml"]);

    let update = ops.get("putPetsByPetId").unwrap();
    assert_eq!(update.parameters.body[0].name, "pet");
    assert_eq!(update.parameters.path[0].name, "petId");
    assert_eq!(update.response.type_name, "Pet");

    let photo = ops.get("postPhoto").unwrap();
    assert_eq!(photo.parameters.body[0].name, "file");
    assert_eq!(photo.parameters.body[0].format, "binary");
    assert!(photo.response.type_name.is_empty());
}

#[test]
fn openapi_components_and_shared_parameters() {
    let result = normalized(PETSTORE_V3);

    let pet = result.definitions.get("Pet").unwrap().properties();
    assert_eq!(pet[2].type_name, "string | null");
    assert_eq!(pet[3].type_name, "string | null");
    assert!(pet[0].required && pet[1].required);

    let list = result.operations.get("listPets").unwrap();
    assert_eq!(list.parameters.query[0].name, "limit");
    assert_eq!(list.parameters.query[0].format, "int32");
    assert_eq!(list.response.type_name, "Array<Pet>");
    assert_eq!(list.response_headers, ["application/json"]);

    assert!(
        result
            .diagnostics
            .with_severity(Severity::Warning)
            .any(|d| d.subject == "DELETE /pets/{petId}")
    );
}

#[test]
fn filter_limits_paths() {
    let doc = parse::from_yaml(PETSTORE_V2).unwrap();
    let options = PathOptions {
        filter: vec!["/pet/**".to_string()],
        ..PathOptions::default()
    };
    let ops = normalize(&doc, &options).unwrap().operations;
    assert!(ops.iter().all(|(_, op)| op.url.starts_with("/pet")));
    assert!(ops.contains("getPetByPetId"));
    assert!(!ops.contains("getUserById"));
}

#[test]
fn ir_serializes_documented_keys() {
    let result = normalized(PETSTORE_V2);
    let json = serde_json::to_value(&result.operations).unwrap();
    let upload = &json["postUploadImage"];
    assert!(upload["parameters"]["formData"].is_array());
    assert_eq!(upload["requestHeaders"][0], "multipart/form-data");
    assert_eq!(upload["method"], "post");

    let defs = serde_json::to_value(&result.definitions).unwrap();
    assert_eq!(defs["Pet"][4]["enumOption"][0], "available");
    assert_eq!(defs["Page<T>"][0]["ref"], "User");
}

#[test]
fn json_input_keeps_document_order() {
    let doc = parse::from_json(
        r#"{
            "swagger": "2.0",
            "paths": {
                "/zz": { "get": { "tags": ["z"], "responses": { "200": { "description": "ok" } } } },
                "/aa": { "get": { "tags": ["a"], "responses": { "200": { "description": "ok" } } } }
            },
            "definitions": {
                "Zeta": {
                    "type": "object",
                    "properties": { "z": { "type": "string" }, "a": { "type": "string" } }
                },
                "Alpha": { "type": "object", "properties": { "id": { "type": "integer" } } }
            }
        }"#,
    )
    .unwrap();
    let normalized = normalize(&doc, &PathOptions::default()).unwrap();

    let names: Vec<_> = normalized.definitions.names().collect();
    assert_eq!(names, ["Zeta", "Alpha"]);
    let entry = normalized.definitions.get("Zeta").unwrap();
    let props: Vec<_> = entry.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(props, ["z", "a"]);
    let operations: Vec<_> = normalized.operations.names().collect();
    assert_eq!(operations, ["getZz", "getAa"]);
}

#[test]
fn malformed_entries_are_skipped_individually() {
    let doc = parse::from_json(
        r#"{
            "openapi": "3.0.3",
            "paths": {
                "/pets": {
                    "get": {
                        "tags": ["pet"],
                        "parameters": [
                            { "name": "broken" },
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "flag": { "type": "boolean", "required": "yes" }
                        }
                    },
                    "Good": { "type": "object", "properties": { "id": { "type": "integer" } } }
                }
            }
        }"#,
    )
    .unwrap();
    let normalized = normalize(&doc, &PathOptions::default()).unwrap();

    assert!(normalized.definitions.get("Good").is_some());
    let entry = normalized.definitions.get("Pet").unwrap();
    let pet: Vec<_> = entry.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(pet, ["name"]);

    let query = &normalized.operations.get("getPets").unwrap().parameters.query;
    assert_eq!(query.len(), 1);
    assert_eq!(query[0].name, "limit");

    let errors = normalized.diagnostics.with_severity(Severity::Error).count();
    assert_eq!(errors, 2);
    assert!(normalized.diagnostics.mentions("Pet.flag"));
    assert!(normalized.diagnostics.mentions("GET /pets"));
}
