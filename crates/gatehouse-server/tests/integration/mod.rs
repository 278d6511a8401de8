mod auth_routes;
mod oauth_callback;
mod pages;
mod storage_routes;
mod users_admin;
