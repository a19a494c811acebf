mod admin_data;
pub use admin_data::{ADMIN_DATA_PATH, admin_data_url, fetch_admin_data};
