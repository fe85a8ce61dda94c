// Route path constants - one path per function, named after the function

pub const HELLO_WORLD: &str = "/helloWorld";
pub const GET_DATA: &str = "/getData";
pub const CHECK_AUTH: &str = "/checkAuth";
pub const HEALTH: &str = "/health";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
