//! End-to-end tests of the shopping list API over HTTP.

use reqwest::header::{IF_MATCH, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde_json::json;

mod common;

use common::{etag, version, TestServer};

fn weekly() -> serde_json::Value {
    json!({
        "Description": "weekly",
        "Date": "2024-05-01",
        "Items": {
            "milk": { "Quantity": 2, "Status": "open" },
            "eggs": { "Quantity": 12, "Status": "done" }
        }
    })
}

#[tokio::test]
async fn test_create_and_fetch_list() {
    let server = TestServer::start().await;

    let res = server.client.post(server.url("/shoppinglists")).json(&weekly()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers()["location"],
        format!("http://{}/shoppinglists/1", server.addr).as_str()
    );
    let list_etag = version(&etag(&res));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["1"]["Description"], "weekly");

    let (etag, body) = server.fetch("/shoppinglists/1").await;
    assert_eq!(version(&etag), list_etag);
    assert_eq!(
        body,
        json!({
            "1": {
                "Description": "weekly",
                "Date": "2024-05-01",
                "Items": {
                    "eggs": { "Quantity": 12, "Status": "done" },
                    "milk": { "Quantity": 2, "Status": "open" }
                }
            }
        })
    );

    let (milk, _) = server.fetch("/shoppinglists/1/items/milk").await;
    let (eggs, _) = server.fetch("/shoppinglists/1/items/eggs").await;
    assert_ne!(milk, eggs);
    assert!(list_etag > version(&milk));
    assert!(list_etag > version(&eggs));
}

#[tokio::test]
async fn test_etags_grow_across_operations() {
    let server = TestServer::start().await;
    let mut seen = Vec::new();

    let (id, list_etag) = server.create_list(weekly()).await;
    seen.push(version(&list_etag));

    let res = server
        .client
        .post(server.url(&format!("/shoppinglists/{id}/items")))
        .json(&json!({ "Name": "bread", "Quantity": 1, "Status": "open" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let bread = etag(&res);
    seen.push(version(&bread));

    let res = server
        .client
        .put(server.url(&format!("/shoppinglists/{id}/items/bread")))
        .header(IF_MATCH, &bread)
        .json(&json!({ "Quantity": 2, "Status": "open" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    seen.push(version(&etag(&res)));

    let (list_etag, _) = server.fetch(&format!("/shoppinglists/{id}")).await;
    let res = server
        .client
        .patch(server.url(&format!("/shoppinglists/{id}")))
        .header(IF_MATCH, &list_etag)
        .json(&json!({ "Date": "2024-05-02" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched = etag(&res);
    seen.push(version(&patched));

    let res = server
        .client
        .put(server.url(&format!("/shoppinglists/{id}")))
        .header(IF_MATCH, &patched)
        .json(&json!({ "Description": "monthly", "Date": "2024-06-01", "Items": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    seen.push(version(&etag(&res)));

    let (second, _) = server.create_list(json!({ "Description": "party" })).await;
    assert_eq!(second, id + 1);

    let (collection, _) = server.fetch("/shoppinglists").await;
    seen.push(version(&collection));

    for pair in seen.windows(2) {
        assert!(pair[1] > pair[0], "{} should exceed {}", pair[1], pair[0]);
    }
}

#[tokio::test]
async fn test_stale_if_match_on_put_is_rejected() {
    let server = TestServer::start().await;
    let (id, created) = server.create_list(weekly()).await;

    let res = server
        .client
        .patch(server.url(&format!("/shoppinglists/{id}")))
        .header(IF_MATCH, &created)
        .json(&json!({ "Description": "changed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (current_etag, current_body) = server.fetch(&format!("/shoppinglists/{id}")).await;

    let res = server
        .client
        .put(server.url(&format!("/shoppinglists/{id}")))
        .header(IF_MATCH, &created)
        .json(&json!({ "Description": "lost update", "Items": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let (after_etag, after_body) = server.fetch(&format!("/shoppinglists/{id}")).await;
    assert_eq!(after_etag, current_etag);
    assert_eq!(after_body, current_body);
    assert_eq!(after_body[id.to_string()]["Description"], "changed");
}

#[tokio::test]
async fn test_write_without_if_match_is_rejected() {
    let server = TestServer::start().await;
    let (id, _) = server.create_list(weekly()).await;

    let res = server
        .client
        .put(server.url(&format!("/shoppinglists/{id}")))
        .json(&json!({ "Description": "blind write" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = server
        .client
        .put(server.url(&format!("/shoppinglists/{id}/items/milk")))
        .json(&json!({ "Quantity": 9, "Status": "open" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let (_, milk) = server.fetch(&format!("/shoppinglists/{id}/items/milk")).await;
    assert_eq!(milk["milk"]["Quantity"], 2);
}

#[tokio::test]
async fn test_item_not_modified_until_changed() {
    let server = TestServer::start().await;
    let (id, _) = server.create_list(weekly()).await;
    let path = format!("/shoppinglists/{id}/items/milk");
    let (seen, _) = server.fetch(&path).await;

    let res = server
        .client
        .get(server.url(&path))
        .header(IF_NONE_MATCH, &seen)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = server
        .client
        .put(server.url(&path))
        .header(IF_MATCH, &seen)
        .json(&json!({ "Quantity": 3, "Status": "open" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .get(server.url(&path))
        .header(IF_NONE_MATCH, &seen)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_ne!(etag(&res), seen);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "milk": { "Quantity": 3, "Status": "open" } }));
}

#[tokio::test]
async fn test_collection_and_items_not_modified() {
    let server = TestServer::start().await;

    let res = server
        .client
        .get(server.url("/shoppinglists"))
        .header(IF_NONE_MATCH, "0")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_MODIFIED);

    let (id, list_etag) = server.create_list(weekly()).await;
    let (collection_etag, _) = server.fetch("/shoppinglists").await;

    let res = server
        .client
        .get(server.url("/shoppinglists"))
        .header(IF_NONE_MATCH, &collection_etag)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_MODIFIED);

    let res = server
        .client
        .get(server.url(&format!("/shoppinglists/{id}/items")))
        .header(IF_NONE_MATCH, &list_etag)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_duplicate_item_name_conflicts() {
    let server = TestServer::start().await;
    let (id, _) = server.create_list(weekly()).await;
    let path = format!("/shoppinglists/{id}/items/milk");
    let (before, _) = server.fetch(&path).await;

    let res = server
        .client
        .post(server.url(&format!("/shoppinglists/{id}/items")))
        .json(&json!({ "Name": "milk", "Quantity": 7, "Status": "done" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let (after, body) = server.fetch(&path).await;
    assert_eq!(after, before);
    assert_eq!(body["milk"]["Quantity"], 2);
}

#[tokio::test]
async fn test_item_location_resolves() {
    let server = TestServer::start().await;
    let (id, _) = server.create_list(json!({ "Description": "x" })).await;

    let res = server
        .client
        .post(server.url(&format!("/shoppinglists/{id}/items")))
        .json(&json!({ "Name": "oat milk", "Quantity": 1, "Status": "open" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = etag(&res);
    let location = res.headers()["location"].to_str().unwrap().to_string();
    assert_eq!(
        location,
        format!("http://{}/shoppinglists/{id}/oat%20milk", server.addr)
    );

    let res = server.client.get(&location).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(etag(&res), created);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["oat milk"]["Quantity"], 1);
}

#[tokio::test]
async fn test_delete_list_removes_items() {
    let server = TestServer::start().await;
    let (id, _) = server.create_list(weekly()).await;
    let (keep, _) = server.create_list(json!({ "Description": "keep" })).await;

    let res = server
        .client
        .delete(server.url(&format!("/shoppinglists/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (_, collection) = server.fetch("/shoppinglists").await;
    assert!(collection.get(id.to_string()).is_none());
    assert!(collection.get(keep.to_string()).is_some());

    for path in [
        format!("/shoppinglists/{id}"),
        format!("/shoppinglists/{id}/items"),
        format!("/shoppinglists/{id}/items/milk"),
        format!("/shoppinglists/{id}/items/eggs"),
    ] {
        let res = server.client.get(server.url(&path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {path}");
    }

    let res = server
        .client
        .delete(server.url(&format!("/shoppinglists/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_item() {
    let server = TestServer::start().await;
    let (id, list_etag) = server.create_list(weekly()).await;

    let res = server
        .client
        .delete(server.url(&format!("/shoppinglists/{id}/items/milk")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (after, body) = server.fetch(&format!("/shoppinglists/{id}/items")).await;
    assert!(version(&after) > version(&list_etag));
    assert_eq!(body, json!({ "eggs": { "Quantity": 12, "Status": "done" } }));

    let res = server
        .client
        .delete(server.url(&format!("/shoppinglists/{id}/items/milk")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_filter_is_exact() {
    let server = TestServer::start().await;
    let (id, _) = server
        .create_list(json!({
            "Items": {
                "milk": { "Quantity": 1, "Status": "done" },
                "eggs": { "Quantity": 1, "Status": "Done" },
                "salt": { "Quantity": 1, "Status": "DONE" },
                "jam": { "Quantity": 1, "Status": "open" }
            }
        }))
        .await;

    let (_, done) = server.fetch(&format!("/shoppinglists/{id}/items?status=done")).await;
    assert_eq!(done, json!({ "milk": { "Quantity": 1, "Status": "done" } }));

    let (_, all) = server.fetch(&format!("/shoppinglists/{id}/items?status=")).await;
    assert_eq!(all.as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_patch_replaces_item_map() {
    let server = TestServer::start().await;
    let (id, created) = server.create_list(weekly()).await;

    let res = server
        .client
        .patch(server.url(&format!("/shoppinglists/{id}")))
        .header(IF_MATCH, &created)
        .json(&json!({ "Items": { "flour": { "Quantity": 1, "Status": "open" } } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched = version(&etag(&res));

    let (_, body) = server.fetch(&format!("/shoppinglists/{id}")).await;
    let list = &body[id.to_string()];
    assert_eq!(list["Description"], "weekly");
    assert_eq!(list["Items"], json!({ "flour": { "Quantity": 1, "Status": "open" } }));

    let (flour, _) = server.fetch(&format!("/shoppinglists/{id}/items/flour")).await;
    assert!(version(&flour) > version(&created));
    assert!(patched > version(&flour));
}

#[tokio::test]
async fn test_bad_requests_leave_store_untouched() {
    let server = TestServer::start().await;
    let (id, list_etag) = server.create_list(weekly()).await;
    let (collection_before, _) = server.fetch("/shoppinglists").await;

    let res = server.client.get(server.url("/shoppinglists/abc")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url("/shoppinglists"))
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url(&format!("/shoppinglists/{id}/items")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url("/shoppinglists"))
        .body("[]")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url(&format!("/shoppinglists/{id}/items")))
        .json(&json!(["milk", 1, "open"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url(&format!("/shoppinglists/{id}/items")))
        .json(&json!({ "Name": "", "Quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .put(server.url(&format!("/shoppinglists/{id}")))
        .header(IF_MATCH, &list_etag)
        .body(r#"{"Items": []}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .put(server.url("/shoppinglists/99"))
        .header(IF_MATCH, "1")
        .json(&json!({ "Description": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .post(server.url("/shoppinglists/99/items"))
        .json(&json!({ "Name": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (collection_after, _) = server.fetch("/shoppinglists").await;
    assert_eq!(collection_after, collection_before);
    let (after, _) = server.fetch(&format!("/shoppinglists/{id}")).await;
    assert_eq!(after, list_etag);
}

#[tokio::test]
async fn test_head_returns_etag_without_body() {
    let server = TestServer::start().await;
    let (id, list_etag) = server.create_list(weekly()).await;

    let res = server
        .client
        .head(server.url(&format!("/shoppinglists/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(etag(&res), list_etag);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await;
    let res = server.client.get(server.url("/shoppinglists")).send().await.unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);

    let res = server
        .client
        .get(server.url("/shoppinglists"))
        .header("x-request-id", "client-supplied")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-supplied");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = TestServer::start_with(|config| config.security.max_body_size = 64).await;
    let (collection_before, _) = server.fetch("/shoppinglists").await;

    let res = server
        .client
        .post(server.url("/shoppinglists"))
        .json(&json!({ "Description": "x".repeat(256) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let (collection_after, lists) = server.fetch("/shoppinglists").await;
    assert_eq!(collection_after, collection_before);
    assert_eq!(lists, json!({}));

    let res = server
        .client
        .post(server.url("/shoppinglists"))
        .json(&json!({ "Description": "small" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}
