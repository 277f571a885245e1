use apimodel::collection::PropertyDescriptor;
use apimodel::http::{HeaderFilter, QueryParam, Request};
use serde_json::{json, Value};

fn raw_request() -> Value {
    json!({
        "url": "https://postman-echo.com/post",
        "method": "POST",
        "header": [
            { "key": "Content-Type", "value": "application/json", "description": "payload type" },
            { "key": "X-Trace", "value": "abc", "type": "text" }
        ],
        "body": { "mode": "raw", "raw": "{\"hello\":\"world\"}" },
        "description": "Echo a JSON body",
        "proxy": { "host": "proxy.local", "port": 8080 }
    })
}

fn header_request() -> Request {
    Request::from_value(json!({
        "url": "postman-echo.com",
        "method": "GET",
        "header": [
            { "key": "some", "value": "header" },
            { "key": "other", "value": "otherheader", "disabled": true }
        ]
    }))
    .unwrap()
}

fn query_params() -> Vec<QueryParam> {
    vec![QueryParam::new("a", "1"), QueryParam::new("b", "2")]
}

#[test]
fn test_json_matches_input() {
    let raw = raw_request();
    let json = Request::from_value(raw.clone()).unwrap().to_json();

    assert_eq!(json["method"], raw["method"]);
    assert_eq!(json["url"], raw["url"]);
    assert_eq!(json["header"], raw["header"]);
    assert_eq!(json["body"], raw["body"]);
    assert_eq!(json["description"], raw["description"]);
    assert_eq!(json["proxy"], raw["proxy"]);
    assert_eq!(json, raw);
}

#[test]
fn test_unknown_fields_survive() {
    let mut raw = raw_request();
    raw["auth"] = json!({ "type": "noauth" });
    let json = Request::from_value(raw.clone()).unwrap().to_json();
    assert_eq!(json["auth"], raw["auth"]);
}

#[test]
fn test_add_query_params() {
    let original = Request::from_value(raw_request()).unwrap();
    let mut request = original.clone();
    let added = query_params();

    request.add_query_params(added.clone());

    assert_eq!(request.url.query.count(), 2);
    request.url.query.each(|param, index| {
        assert_eq!(param.key, added[index].key);
        assert_eq!(param.value, added[index].value);
    });
    assert!(original.url.query.is_empty());
}

#[test]
fn test_add_query_params_from_string() {
    let mut request = Request::new();
    request.add_query_params("a=1&b=2");
    assert_eq!(request.url.query_string(), "a=1&b=2");
}

#[test]
fn test_remove_query_params() {
    let mut request = Request::from_value(raw_request()).unwrap().clone();
    let params = query_params();

    request.add_query_params(params.clone());
    request.remove_query_params(params[0].key.as_str());

    assert_eq!(request.url.query.count(), 1);
    let mut visits = 0;
    request.url.query.each(|param, _| {
        visits += 1;
        assert_eq!(param, &params[1]);
    });
    assert_eq!(visits, 1);
}

#[test]
fn test_get_headers_only_enabled() {
    let headers = header_request().get_headers(HeaderFilter::enabled());
    assert_eq!(headers.len(), 1);
    assert_eq!(headers["some"], "header");
}

#[test]
fn test_get_headers_empty_request() {
    assert!(Request::new().get_headers(HeaderFilter::default()).is_empty());
}

#[test]
fn test_upsert_header_adds_new() {
    let mut request = header_request();
    request
        .upsert_header(Some(PropertyDescriptor::new("third", "header")))
        .unwrap();

    assert_eq!(
        request.headers.to_json(),
        json!([
            { "key": "some", "value": "header" },
            { "key": "other", "value": "otherheader", "disabled": true },
            { "key": "third", "value": "header" }
        ])
    );
}

#[test]
fn test_upsert_header_replaces_value() {
    let mut request = header_request();
    request
        .upsert_header(Some(PropertyDescriptor::new("other", "changedvalue")))
        .unwrap();

    assert_eq!(
        request.headers.to_json(),
        json!([
            { "key": "some", "value": "header" },
            { "key": "other", "value": "changedvalue", "disabled": true }
        ])
    );
}

#[test]
fn test_upsert_header_without_header() {
    let mut request = header_request();
    let before = request.headers.all();
    assert!(request.upsert_header(None).unwrap().is_none());
    assert_eq!(request.headers.all(), before);
}

#[test]
fn test_empty_request() {
    let request = Request::from_value(Value::Null).unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.headers.count(), 0);
    assert_eq!(request.url.to_string(), "");
}

#[test]
fn test_clone_is_deep() {
    let original = header_request();
    let mut copy = original.clone();
    copy.remove_header("some");
    copy.add_query_params("x=1");

    assert_eq!(original.headers.count(), 2);
    assert!(original.url.query.is_empty());
    assert_eq!(original.to_json()["url"], json!("postman-echo.com"));
}
