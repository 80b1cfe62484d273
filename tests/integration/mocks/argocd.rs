use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

pub const TOKEN: &str = "random_token";

pub fn get_mock(pathname: &str, response: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/{path}", path = pathname)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
}

pub fn status_mock(http_method: &str, pathname: &str, status: u16) -> Mock {
    Mock::given(method(http_method))
        .and(path(format!("/api/v1/{path}", path = pathname)))
        .respond_with(ResponseTemplate::new(status).set_body_string("permission denied"))
        .expect(1)
}

pub fn write_mock(http_method: &str, pathname: &str, response: serde_json::Value) -> Mock {
    Mock::given(method(http_method))
        .and(path(format!("/api/v1/{path}", path = pathname)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
}
