use serde::Deserialize;

/// `{"data": [...]}` envelope used by list-shaped endpoints
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T: Default> DataEnvelope<T> {
    /// First element of `data`, or `T::default()` when the list is empty.
    pub fn into_first_or_default(self) -> T {
        self.data.into_iter().next().unwrap_or_default()
    }
}

/// `{"success": bool}` envelope returned by delete and status updates
#[derive(Debug, Default, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}
