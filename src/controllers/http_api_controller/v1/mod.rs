pub(crate) mod dto;
pub(crate) mod eligible_item_http_api_controller;
pub(crate) mod info_http_api_controller;
pub(crate) mod round_http_api_controller;
