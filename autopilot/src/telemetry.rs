use std::sync::{PoisonError, RwLock};

use crate::types::FlightData;

/// Latest flight data, refreshed by whoever listens to the vehicle
#[derive(Default, Debug)]
pub struct Telemetry {
    data: RwLock<FlightData>,
}

impl Telemetry {
    pub fn new(data: FlightData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn snapshot(&self) -> FlightData {
        *self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn height(&self) -> i16 {
        self.snapshot().height
    }

    pub fn yaw(&self) -> i16 {
        self.snapshot().yaw
    }

    pub fn update<F: FnOnce(&mut FlightData)>(&self, f: F) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_writer() {
        let telemetry = Arc::new(Telemetry::default());
        let writer = {
            let telemetry = telemetry.clone();
            thread::spawn(move || {
                for h in 1..=100 {
                    telemetry.update(|fd| fd.height = h);
                }
            })
        };
        let mut last = 0;
        for _ in 0..100 {
            let height = telemetry.height();
            assert!(height >= last);
            last = height;
        }
        writer.join().unwrap();
        assert_eq!(telemetry.snapshot(), FlightData { height: 100, yaw: 0 });
    }
}
