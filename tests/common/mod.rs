use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};

/// Serves every request with `status` and records the requested path+query.
pub fn spawn_server(status: StatusCode) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);

    let make_svc = make_service_fn(move |_conn| {
        let recorder = Arc::clone(&recorder);
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let recorder = Arc::clone(&recorder);
                async move {
                    let target = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.to_string())
                        .unwrap_or_default();
                    recorder.lock().unwrap().push(target);
                    let body = if status == StatusCode::NO_CONTENT {
                        Body::empty()
                    } else {
                        Body::from(r#"{"ret_code":0,"msg":"OK","data":{"items":[]}}"#)
                    };
                    let response = Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(body)
                        .unwrap();
                    Ok::<_, Infallible>(response)
                }
            }))
        }
    });

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);

    (addr, seen)
}

