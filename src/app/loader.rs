//! Background testimonial fetch to keep the UI thread responsive.

use tokio::sync::mpsc;

use crate::core::testimonial::{ItemSource, SourceError, Testimonial};

/// Result of one fetch, tagged with the generation that requested it.
#[derive(Debug)]
pub struct LoadUpdate {
    pub generation: u64,
    pub result: Result<Vec<Testimonial>, SourceError>,
}

/// Fetch `source` on a worker thread and send the result to `tx`.
pub fn spawn_load(tx: mpsc::UnboundedSender<LoadUpdate>, generation: u64, source: ItemSource) {
    std::thread::spawn(move || {
        let t0 = std::time::Instant::now();
        let result = source.fetch();
        tracing::debug!(
            generation,
            source = %source.label(),
            ok = result.is_ok(),
            "testimonial fetch finished in {:.2?}",
            t0.elapsed()
        );
        let _ = tx.send(LoadUpdate { generation, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_load_arrives_with_its_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_load(tx, 4, ItemSource::Demo);

        let update = rx.recv().await.expect("load update");
        assert_eq!(update.generation, 4);
        assert!(!update.result.expect("demo items").is_empty());
    }
}
