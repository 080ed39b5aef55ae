use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub check_in_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl AttendanceRecord {
    /// Checked in and not yet checked out
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttendanceField {
    Id,
    EmployeeId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendancePatch {
    pub check_out_time: Option<NaiveTime>,
    pub location: Option<GeoPoint>,
}
