use chrono::{Datelike, Days, NaiveTime, Utc};
use once_cell::sync::Lazy;
use serde_json::json;
use uuid::Uuid;

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
    cookie: String,
}

static REDIS_CLIENT: Lazy<redis::Client> = Lazy::new(|| {
    redis::Client::open("redis://127.0.0.1:6379/").unwrap()
});

impl TestContext {
    /// Seeds an auth session directly in Redis, the way the external
    /// identity collaborator would, and returns a context sending its cookie.
    async fn authenticated(username: &str) -> Self {
        let session_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut con = REDIS_CLIENT.get_connection_manager().await.unwrap();
        let session = json!({
            "user_id": user_id,
            "username": username,
            "expires_at": (Utc::now() + chrono::Duration::days(1)).to_rfc3339(),
        });
        let _: () = redis::cmd("SET")
            .arg(format!("auth:{}", session_id))
            .arg(session.to_string())
            .query_async(&mut con)
            .await
            .unwrap();

        Self {
            client: reqwest::Client::new(),
            base_url: "http://127.0.0.1:3000".to_string(),
            cookie: format!("session_id={}", session_id),
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("Cookie", &self.cookie)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn patch(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .header("Cookie", &self.cookie)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("Cookie", &self.cookie)
            .send()
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    /// Drives the full booking flow against a running server: profile
    /// creation, counselor vetting, availability publication, slot
    /// resolution and the booking invariants.
    #[tokio::test]
    #[ignore = "requires a running server, PostgreSQL and Redis"]
    async fn booking_flow_end_to_end() {
        let stamp = Utc::now().timestamp();
        let counselor = TestContext::authenticated(&format!("counselor_{}", stamp)).await;
        let client = TestContext::authenticated(&format!("client_{}", stamp)).await;

        // Profiles for both parties.
        let resp = counselor.post("/api/profiles", json!({"bio": "CBT specialist"})).await;
        assert_eq!(resp.status().as_u16(), 201);
        let counselor_profile: Value = resp.json().await.unwrap();
        let counselor_id = counselor_profile["id"].as_str().unwrap().to_string();

        let resp = client.post("/api/profiles", json!({})).await;
        assert_eq!(resp.status().as_u16(), 201);

        // One profile per account: a second create is a 400, not a 500.
        let resp = client.post("/api/profiles", json!({})).await;
        assert_eq!(resp.status().as_u16(), 400);

        // Counselor vetting: submit and approve an application.
        let resp = counselor
            .post(
                "/api/counselor-applications",
                json!({"specialization": "CBT", "experience_years": 5}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 201);
        let application: Value = resp.json().await.unwrap();
        let application_id = application["id"].as_str().unwrap();

        let resp = counselor
            .patch(
                &format!("/api/counselor-applications/{}/status", application_id),
                json!({"status": "approved"}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200);

        // Publish availability for tomorrow's weekday, 09:00-11:00.
        let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();
        let day_of_week = tomorrow.weekday().num_days_from_monday();
        let resp = counselor
            .post(
                "/api/availability",
                json!({
                    "day_of_week": day_of_week,
                    "start_time": "09:00:00",
                    "end_time": "11:00:00"
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 201);

        let nine = tomorrow
            .and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
            .and_utc();
        let ten = tomorrow
            .and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
            .and_utc();

        // The resolver offers both instants.
        let resp = counselor
            .get(&format!("/api/profiles/{}/availability", counselor_id))
            .await;
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        let open: Vec<String> = body["available_slots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert!(open.contains(&nine.to_rfc3339()));
        assert!(open.contains(&ten.to_rfc3339()));

        // Booking in the past is rejected.
        let resp = client
            .post(
                "/api/sessions",
                json!({
                    "counselor_id": counselor_id,
                    "datetime": (Utc::now() - chrono::Duration::hours(1)).to_rfc3339()
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);

        // Booking outside availability is rejected.
        let resp = client
            .post(
                "/api/sessions",
                json!({
                    "counselor_id": counselor_id,
                    "datetime": tomorrow
                        .and_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap())
                        .and_utc()
                        .to_rfc3339()
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);

        // A valid booking succeeds with status pending.
        let resp = client
            .post(
                "/api/sessions",
                json!({"counselor_id": counselor_id, "datetime": nine.to_rfc3339()}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 201);
        let session: Value = resp.json().await.unwrap();
        assert_eq!(session["status"], "pending");
        let session_id = session["id"].as_str().unwrap();

        // A second booking for the same instant is rejected.
        let resp = client
            .post(
                "/api/sessions",
                json!({"counselor_id": counselor_id, "datetime": nine.to_rfc3339()}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);

        // The booked instant disappears from the resolver; 10:00 remains.
        let resp = client
            .get(&format!("/api/profiles/{}/availability", counselor_id))
            .await;
        let body: Value = resp.json().await.unwrap();
        let open: Vec<String> = body["available_slots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert!(!open.contains(&nine.to_rfc3339()));
        assert!(open.contains(&ten.to_rfc3339()));

        // Lifecycle: pending -> confirmed -> completed, then frozen.
        let resp = counselor
            .patch(
                &format!("/api/sessions/{}/status", session_id),
                json!({"status": "confirmed"}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200);

        let resp = counselor
            .patch(
                &format!("/api/sessions/{}/status", session_id),
                json!({"status": "completed"}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200);

        let resp = counselor
            .patch(
                &format!("/api/sessions/{}/status", session_id),
                json!({"status": "pending"}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);

        // A completed session stays completed: cancellation must not land.
        let resp = counselor
            .patch(
                &format!("/api/sessions/{}/status", session_id),
                json!({"status": "cancelled"}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);
        let resp = counselor
            .get(&format!("/api/sessions/{}", session_id))
            .await;
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "completed");

        // Unknown status values are rejected outright.
        let resp = counselor
            .patch(
                &format!("/api/sessions/{}/status", session_id),
                json!({"status": "archived"}),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);

        // A completed session can be reviewed exactly once, by its client.
        let resp = client
            .post(
                "/api/reviews",
                json!({
                    "session_id": session_id,
                    "counselor_id": counselor_id,
                    "rating": 5,
                    "comment": "Very helpful."
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 201);

        let resp = client
            .post(
                "/api/reviews",
                json!({
                    "session_id": session_id,
                    "counselor_id": counselor_id,
                    "rating": 4
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 400);
    }
}
