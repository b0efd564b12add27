// Standardized error codes for the Kliniq assistant engine

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const UNSUPPORTED_LANGUAGE: &str = "VALIDATION_1003";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_2001";
}

pub mod network {
    pub const REQUEST_FAILED: &str = "NET_3001";
    pub const TIMEOUT: &str = "NET_3002";
    pub const UPSTREAM_STATUS: &str = "NET_3003";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
}

pub mod system {
    pub const CONFIGURATION: &str = "SYS_5001";
    pub const INTERNAL: &str = "SYS_5002";
}
