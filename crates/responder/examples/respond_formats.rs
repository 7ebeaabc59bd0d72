use http::{HeaderValue, Request, Response};
use micro_responder::{with, FormatRegistry};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug)]
struct User {
    id: u32,
    name: &'static str,
}

fn show_user(request: &Request<()>, user: &User) -> Response<String> {
    let negotiated = with("html", || ("html", format!("<h1>{}</h1><p>id: {}</p>", user.name, user.id)))
        .attach("json", || ("json", format!(r#"{{"id":{},"name":"{}"}}"#, user.id, user.name)))
        .attach(["csv", "txt"], || ("csv", format!("{},{}", user.id, user.name)))
        .resolve(request);

    let Some((format, body)) = negotiated else {
        return Response::new(String::new());
    };

    let mut response = Response::new(body);
    let content_type = FormatRegistry::global()
        .media_type_for(format)
        .and_then(|media_type| HeaderValue::from_str(&media_type).ok());
    if let Some(content_type) = content_type {
        response.headers_mut().insert(http::header::CONTENT_TYPE, content_type);
    }
    response
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    FormatRegistry::global().try_register(mime::TEXT_CSV.as_ref(), "csv").expect("text/csv is a valid media type");

    let user = User { id: 7, name: "zava" };
    let requests = [
        ("/users/7.json", "text/html"),
        ("/users/7", "text/html"),
        ("/users/7", "text/plain,text/csv"),
        ("/users/7.txt", ""),
        ("/users/7", "image/png"),
    ];

    for (uri, accept) in requests {
        let request = Request::builder().uri(uri).header(http::header::ACCEPT, accept).body(()).expect("valid request");
        let response = show_user(&request, &user);
        info!(uri, accept, content_type = ?response.headers().get(http::header::CONTENT_TYPE), body = %response.body());
    }
}
