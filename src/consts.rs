pub const WEB_APP_DATA: &str = "WebAppData";

pub const USER_FIELD: &str = "user";
pub const AUTH_DATE_FIELD: &str = "auth_date";
pub const START_PARAM_FIELD: &str = "start_param";
pub const CHAT_TYPE_FIELD: &str = "chat_type";
pub const CHAT_INSTANCE_FIELD: &str = "chat_instance";
pub const HASH_FIELD: &str = "hash";

pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
