use mirror_dom::{Attributes, Document, EventData, EventHandlers, Node, TreeResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Handles to the interesting nodes of the demo page
pub struct DemoPage {
    pub button: Node,
    pub input: Node,
    pub counter: Node,
    pub echo: Node,
}

/// Build a small counter page under the document root:
///
/// ```text
/// root
/// └─ div.counter
///    ├─ button (click) ── "Increment"
///    ├─ span ── "0 clicks"
///    ├─ input (input)
///    └─ p ── ""
/// ```
pub fn build(doc: &Document) -> TreeResult<DemoPage> {
    let container = doc.create_tag("div", EventHandlers::new());
    container.set_attributes(attributes(&[("class", "counter")]))?;

    let counter = doc.create_text("0 clicks");
    let echo = doc.create_text("");

    let clicks = Arc::new(AtomicUsize::new(0));
    let label = counter.clone();
    let button = doc.create_tag(
        "button",
        EventHandlers::new().on("click", move |_| {
            let total = clicks.fetch_add(1, Ordering::SeqCst) + 1;
            if let Err(e) = label.set_value(format!("{} clicks", total)) {
                tracing::error!("Failed to update counter: {}", e);
            }
        }),
    );
    button.insert_at(0, &doc.create_text("Increment"))?;

    let mirror = echo.clone();
    let input = doc.create_tag(
        "input",
        EventHandlers::new().on("input", move |data| {
            if let EventData::Input { value } = data {
                if let Err(e) = mirror.set_value(value.clone()) {
                    tracing::error!("Failed to echo input: {}", e);
                }
            }
        }),
    );
    input.set_attributes(attributes(&[("type", "text"), ("placeholder", "Type here")]))?;

    let span = doc.create_tag("span", EventHandlers::new());
    span.insert_at(0, &counter)?;
    let paragraph = doc.create_tag("p", EventHandlers::new());
    paragraph.insert_at(0, &echo)?;

    container.insert_at(0, &button)?;
    container.insert_at(1, &span)?;
    container.insert_at(2, &input)?;
    container.insert_at(3, &paragraph)?;
    doc.root().insert_at(0, &container)?;

    Ok(DemoPage {
        button,
        input,
        counter,
        echo,
    })
}

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_dom::{EventPayload, PipelineConfig, RecordingSink};
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_demo_click_updates_counter() {
        let sink = Arc::new(RecordingSink::new());
        let doc = Document::new(sink.clone(), PipelineConfig::default()).unwrap();
        let page = build(&doc).unwrap();

        doc.deliver(page.button.id(), EventPayload::new("click", EventData::Focus))
            .await
            .unwrap();

        timeout(Duration::from_secs(1), async {
            while page.counter.value().unwrap() != "1 clicks" {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("counter not updated");

        let last = sink.commands_for(page.counter.id()).pop().unwrap();
        assert_eq!(last.fields.get("value"), Some(&Some("1 clicks".to_string())));
    }

    #[tokio::test]
    async fn test_demo_input_echoes() {
        let doc = Document::new(Arc::new(RecordingSink::new()), PipelineConfig::default()).unwrap();
        let page = build(&doc).unwrap();

        doc.deliver(
            page.input.id(),
            EventPayload::new(
                "input",
                EventData::Input {
                    value: "hello".to_string(),
                },
            ),
        )
        .await
        .unwrap();

        timeout(Duration::from_secs(1), async {
            while page.echo.value().unwrap() != "hello" {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("echo not updated");
    }
}
