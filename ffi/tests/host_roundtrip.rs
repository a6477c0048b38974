//! Drives the C ABI the way an engine host would: build through
//! `snc_build_*`, execute with the host's own HTTP stack (ureq here), then
//! hand the outcome back to `snc_classify` / `snc_parse_*`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use snc_ffi::types::*;
use snc_ffi::*;

fn spawn_mock_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn c_str<'a>(p: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(p) }.to_str().unwrap()
}

/// Status and body of a request executed by the "host".
struct Executed {
    status: u16,
    body: CString,
}

impl Executed {
    fn response(&self) -> FfiHttpResponse {
        FfiHttpResponse {
            transport_succeeded: true,
            status: self.status,
            body: self.body.as_ptr(),
        }
    }
}

/// Execute a request built by the C ABI, then free it.
fn execute(req: *mut FfiHttpRequest) -> (u32, Executed) {
    assert!(!req.is_null());
    let r = unsafe { &*req };
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let url = c_str(r.url);
    let body = (!r.body.is_null()).then(|| c_str(r.body).to_string());
    let result = match (r.method, body) {
        (FfiHttpMethod::Get, _) => agent.get(url).call(),
        (FfiHttpMethod::Delete, _) => agent.delete(url).call(),
        (FfiHttpMethod::Post, Some(b)) => agent.post(url).content_type("application/json").send(b.as_bytes()),
        (FfiHttpMethod::Post, None) => agent.post(url).send_empty(),
        (FfiHttpMethod::Put, Some(b)) => agent.put(url).content_type("application/json").send(b.as_bytes()),
        (FfiHttpMethod::Put, None) => agent.put(url).send_empty(),
    };
    let mut response = result.expect("HTTP transport error");
    let status = response.status().as_u16();
    let text = response.body_mut().read_to_string().unwrap_or_default();

    let operation = r.operation as u32;
    snc_free_request(req);
    (
        operation,
        Executed {
            status,
            body: CString::new(text).unwrap(),
        },
    )
}

fn classify(operation: u32, executed: &Executed) -> (bool, String) {
    let result = snc_classify(operation, &executed.response());
    let r = unsafe { &*result };
    let out = (r.success, c_str(r.message).to_string());
    snc_free_operation_result(result);
    out
}

#[test]
fn navigation_through_the_c_abi() {
    let addr = spawn_mock_server();
    let url = CString::new(format!("http://{addr}")).unwrap();
    let client = snc_client_new(url.as_ptr());

    // Step 1: start a route (201).
    let (op, executed) = execute(snc_build_start_navigation(
        client,
        FfiGpsLocation { latitude: 40.7128, longitude: -74.006 },
        FfiGpsLocation { latitude: 40.73, longitude: -73.99 },
    ));
    assert_eq!(executed.status, 201);
    assert_eq!(classify(op, &executed), (true, "Operation successful".to_string()));

    // Step 2: update location and read the instruction.
    let route = CString::new("route_1").unwrap();
    let (_, executed) = execute(snc_build_update_location(
        client,
        route.as_ptr(),
        FfiGpsLocation { latitude: 40.713, longitude: -74.005 },
    ));
    let result = snc_parse_update_location(client, &executed.response());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let instruction = unsafe { &*(r.data as *const FfiNavigationInstruction) };
    assert_eq!(c_str(instruction.instruction), "Head north on Main Street for 500 meters");
    assert_eq!(instruction.distance_meters, 1150.0);
    assert_eq!(instruction.duration_seconds, 870);
    snc_free_result(result);

    // Step 3: detection before any frame was published.
    let (_, executed) = execute(snc_build_latest_detection(client));
    let result = snc_parse_latest_detection(client, &executed.response());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Http);
    assert_eq!(r.http_status, 404);
    snc_free_result(result);

    snc_client_free(client);
}

#[test]
fn device_errors_and_content_through_the_c_abi() {
    let addr = spawn_mock_server();
    let url = CString::new(format!("http://{addr}")).unwrap();
    let client = snc_client_new(url.as_ptr());

    let id = CString::new("dev1").unwrap();
    let kind = CString::new("arduino").unwrap();
    let message = CString::new("battery low").unwrap();

    // Unregistered device: 404 with the server's body.
    let (op, executed) = execute(snc_build_report_device_error(client, id.as_ptr(), message.as_ptr()));
    let (success, msg) = classify(op, &executed);
    assert!(!success);
    assert_eq!(msg, r#"HTTP 404: {"detail":"Device dev1 not registered"}"#);

    let (op, executed) = execute(snc_build_register_device(client, id.as_ptr(), kind.as_ptr()));
    assert!(classify(op, &executed).0);
    let (op, executed) = execute(snc_build_report_device_error(client, id.as_ptr(), message.as_ptr()));
    assert_eq!(classify(op, &executed), (true, "Operation successful".to_string()));

    // Content: create, delete (204), delete again (404).
    let name = CString::new("Crosswalk").unwrap();
    let (op, executed) = execute(snc_build_create_content(client, name.as_ptr(), std::ptr::null(), std::ptr::null()));
    assert!(classify(op, &executed).0);

    let (op, executed) = execute(snc_build_delete_content(client, 1));
    assert_eq!(executed.status, 204);
    assert_eq!(classify(op, &executed), (true, "Deletion successful".to_string()));

    let (op, executed) = execute(snc_build_delete_content(client, 1));
    assert!(!classify(op, &executed).0);

    snc_client_free(client);
}
