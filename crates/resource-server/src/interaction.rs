//! The clinic interaction routes.
//!
//! One route per interaction shape, mirroring how a ward talks to the
//! backend: a patient-data request gets exactly one reply, a checkout is
//! dispatched without waiting for billing, and claims or vaccine
//! deliveries arrive as a paced stream.

use std::time::Duration;

use resource_core::InteractionRouter;
use tracing::info;

use crate::model::{Claim, ClinicalData, Patient, Vaccine};

/// Builds the interaction route table. `delay` paces stream emissions.
pub fn clinic_routes(delay: Duration) -> InteractionRouter {
    InteractionRouter::new(delay)
        .request_response("get-patient-data", |patient: Patient| async move {
            info!(patient = %patient.name, "received patient");
            Ok(ClinicalData {
                heart_rate: 90,
                blood_pressure: "80/120".to_string(),
            })
        })
        .fire_and_forget("patient-checkout", |patient: Patient| async move {
            info!(patient = %patient.name, "patient checking out");
            info!("billing initiated");
        })
        .request_stream("claim-stream", |_: ()| {
            Ok(vec![
                Claim::new(1000.0, "MRI"),
                Claim::new(2000.0, "Surgery"),
                Claim::new(500.0, "XRay"),
            ])
        })
        .request_stream("vaccines", |_: ()| {
            Ok(vec![
                Vaccine::delivered("Pfizer"),
                Vaccine::delivered("J&J"),
                Vaccine::delivered("Moderna"),
            ])
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_core::StreamEvent;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn patient_data_replies_with_fixed_vitals() {
        let routes = clinic_routes(Duration::ZERO);
        let reply = routes
            .request("get-patient-data", json!({"name": "Doge"}))
            .await
            .unwrap();
        let data: ClinicalData = serde_json::from_value(reply).unwrap();
        assert_eq!(data.heart_rate, 90);
        assert_eq!(data.blood_pressure, "80/120");
    }

    #[tokio::test]
    async fn claim_stream_emits_the_three_claims_in_order() {
        let routes = clinic_routes(Duration::ZERO);
        let mut sub = routes.stream("claim-stream", Value::Null).unwrap();
        sub.request(10).await;

        let mut claims = Vec::new();
        while let Some(event) = sub.next().await {
            match event {
                StreamEvent::Item(item) => {
                    claims.push(serde_json::from_value::<Claim>(item).unwrap())
                }
                StreamEvent::Complete => break,
                StreamEvent::Error(err) => panic!("unexpected stream error: {err}"),
            }
        }
        assert_eq!(
            claims,
            vec![
                Claim::new(1000.0, "MRI"),
                Claim::new(2000.0, "Surgery"),
                Claim::new(500.0, "XRay"),
            ]
        );
    }

    #[tokio::test]
    async fn vaccine_stream_reports_all_deliveries() {
        let routes = clinic_routes(Duration::ZERO);
        let mut sub = routes.stream("vaccines", Value::Null).unwrap();
        sub.request(3).await;

        let mut names = Vec::new();
        while let Some(StreamEvent::Item(item)) = sub.next().await {
            let vaccine: Vaccine = serde_json::from_value(item).unwrap();
            assert!(vaccine.delivered);
            names.push(vaccine.name);
        }
        assert_eq!(names, ["Pfizer", "J&J", "Moderna"]);
    }
}
