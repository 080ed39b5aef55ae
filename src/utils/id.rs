use uuid::Uuid;

/// Fresh record id such as `att-5f0c…`
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
