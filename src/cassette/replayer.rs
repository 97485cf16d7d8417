//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use serde_json::Value;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette.
///
/// Each request is answered by the first unserved interaction recorded for
/// the same port, method and input. Concurrent calls complete in any order
/// while recording, so matching on input keeps replay independent of that
/// order.
pub struct CassetteReplayer {
    /// Per port+method queue of interactions (in order).
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    /// Per port+method flags marking interactions already served.
    served: HashMap<PortMethodKey, Vec<bool>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let served = queues.iter().map(|(k, q)| (k.clone(), vec![false; q.len()])).collect();
        Self { queues, served }
    }

    /// Return the next unserved interaction for `port::method` whose recorded
    /// input equals `input`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the request when the cassette has no such
    /// interaction left.
    pub fn next_matching(
        &mut self,
        port: &str,
        method: &str,
        input: &Value,
    ) -> Result<&Interaction, String> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(format!(
                "Cassette has no interactions for {port}::{method}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            ));
        };
        let served = self.served.entry(key).or_insert_with(|| vec![false; queue.len()]);

        let index = queue
            .iter()
            .zip(served.iter())
            .position(|(interaction, done)| !done && interaction.input == *input)
            .ok_or_else(|| {
                format!(
                    "Cassette exhausted: no unserved {port}::{method} interaction with input \
                     {input} ({count} recorded)",
                    count = queue.len()
                )
            })?;

        served[index] = true;
        Ok(&queue[index])
    }
}
