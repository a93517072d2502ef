//! Refuses a second insert of a record while the first is still running

use crate::models::Record;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when an identical record for the same table is already being
    /// inserted. The slot is held until the returned value is dropped.
    pub fn try_begin<R: Record>(&self, record: &R) -> Result<Option<InFlight>> {
        let key = format!("{}:{}", R::TABLE, serde_json::to_string(record)?);

        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(key.clone()) {
            return Ok(None);
        }

        Ok(Some(InFlight {
            key,
            in_flight: self.in_flight.clone(),
        }))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}

pub struct InFlight {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentRequest, ContactMessage};

    #[test]
    fn test_identical_record_is_refused_until_released() {
        let guard = SubmissionGuard::new();
        let record = ContactMessage {
            email: "ada@example.com".to_string(),
            ..Default::default()
        };

        let first = guard.try_begin(&record).unwrap();
        assert!(first.is_some());
        assert!(guard.try_begin(&record).unwrap().is_none());
        assert_eq!(guard.in_flight(), 1);

        drop(first);
        assert_eq!(guard.in_flight(), 0);
        assert!(guard.try_begin(&record).unwrap().is_some());
    }

    #[test]
    fn test_different_records_proceed_together() {
        let guard = SubmissionGuard::new();
        let ada = ContactMessage {
            first_name: "Ada".to_string(),
            ..Default::default()
        };
        let grace = ContactMessage {
            first_name: "Grace".to_string(),
            ..Default::default()
        };

        let _a = guard.try_begin(&ada).unwrap().unwrap();
        let _g = guard.try_begin(&grace).unwrap().unwrap();
        let _empty_appointment = guard.try_begin(&AppointmentRequest::default()).unwrap().unwrap();
        assert_eq!(guard.in_flight(), 3);
    }
}
