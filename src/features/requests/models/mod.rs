mod service_request;

pub use service_request::ServiceRequest;
