pub mod naver_local_search_response;
pub mod place_search_error;
