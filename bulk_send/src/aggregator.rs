//! Agregação dos resultados de um lote

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attempt::SendOutcome;

/// Resultado de uma invocação; `successful_sends + failed_sends == total_contacts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendResult {
    pub total_contacts: usize,
    pub successful_sends: usize,
    pub failed_sends: usize,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// `start()` antes da primeira tentativa, `aggregate()` depois da última
pub struct ResultAggregator {
    started_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tally {
    successes: usize,
    failures: usize,
    errors: Vec<String>,
}

impl ResultAggregator {
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    pub fn aggregate<I>(self, outcomes: I) -> BulkSendResult
    where
        I: IntoIterator<Item = SendOutcome>,
    {
        let tally = outcomes.into_iter().fold(Tally::default(), |mut tally, outcome| {
            if outcome.success {
                tally.successes += 1;
            } else {
                tally.failures += 1;
                tally.errors.push(
                    outcome
                        .error
                        .unwrap_or_else(|| format!("Contact {}: send failed", outcome.contact_id)),
                );
            }
            tally
        });

        // relógio de parede pode recuar; completed_at nunca fica antes de started_at
        let completed_at = Utc::now().max(self.started_at);

        BulkSendResult {
            total_contacts: tally.successes + tally.failures,
            successful_sends: tally.successes,
            failed_sends: tally.failures,
            errors: tally.errors,
            started_at: self.started_at,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactId;
    use chrono::Duration;

    #[test]
    fn test_empty_outcomes() {
        let result = ResultAggregator::start().aggregate(Vec::new());
        assert_eq!(result.total_contacts, 0);
        assert_eq!(result.successful_sends, 0);
        assert_eq!(result.failed_sends, 0);
        assert!(result.errors.is_empty());
        assert!(result.completed_at >= result.started_at);
    }

    #[test]
    fn test_counts_and_error_order() {
        let ids: Vec<ContactId> = (0..5).map(|_| ContactId::new()).collect();
        let outcomes = vec![
            SendOutcome::succeeded(ids[0]),
            SendOutcome::failed(ids[1], "first"),
            SendOutcome::succeeded(ids[2]),
            SendOutcome::failed(ids[3], "second"),
            SendOutcome::succeeded(ids[4]),
        ];

        let result = ResultAggregator::start().aggregate(outcomes);
        assert_eq!(result.total_contacts, 5);
        assert_eq!(result.successful_sends, 3);
        assert_eq!(result.failed_sends, 2);
        assert_eq!(result.errors, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_failure_without_message_still_recorded() {
        let id = ContactId::new();
        let outcome = SendOutcome {
            contact_id: id,
            success: false,
            error: None,
        };

        let result = ResultAggregator::start().aggregate(vec![outcome]);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains(&id.to_string()));
    }

    #[test]
    fn test_completed_never_before_started() {
        let future_start = Utc::now() + Duration::hours(1);
        let result = ResultAggregator::started_at(future_start).aggregate(Vec::new());
        assert_eq!(result.completed_at, result.started_at);
    }

    #[test]
    fn test_json_shape() {
        let result = ResultAggregator::start().aggregate(vec![SendOutcome::succeeded(ContactId::new())]);
        let value = serde_json::to_value(&result).unwrap();

        for key in ["totalContacts", "successfulSends", "failedSends", "errors", "startedAt", "completedAt"] {
            assert!(value.get(key).is_some(), "campo {} ausente", key);
        }
        assert_eq!(value["totalContacts"], 1);
    }
}
