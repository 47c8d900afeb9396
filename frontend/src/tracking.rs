use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Reflect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingEvent {
    ViewContent,
    SubmitForm,
    ClickButton,
}

impl TrackingEvent {
    pub fn tiktok_name(&self) -> &'static str {
        match self {
            TrackingEvent::ViewContent => "ViewContent",
            TrackingEvent::SubmitForm => "SubmitForm",
            TrackingEvent::ClickButton => "ClickButton",
        }
    }

    pub fn snapchat_name(&self) -> &'static str {
        match self {
            TrackingEvent::ViewContent => "PAGE_VIEW",
            TrackingEvent::SubmitForm => "VIEW_CONTENT",
            TrackingEvent::ClickButton => "AD_CLICK",
        }
    }
}

/// A conversion sink. Recording never fails from the caller's point of view.
pub trait TrackingCollector {
    fn name(&self) -> &'static str;
    fn record(&self, event: TrackingEvent);
}

pub struct NullCollector;

impl TrackingCollector for NullCollector {
    fn name(&self) -> &'static str {
        "null"
    }

    fn record(&self, _event: TrackingEvent) {}
}

/// Looks up a vendor global on `window`. `None` when the script never loaded.
fn vendor_global(key: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn report_failure(collector: &str, event: &str, result: Result<JsValue, JsValue>) {
    if let Err(err) = result {
        warn!("{} pixel threw on {}: {:?}", collector, event, err);
    }
}

/// `window.ttq.track(name)`
pub struct TikTokPixel;

impl TrackingCollector for TikTokPixel {
    fn name(&self) -> &'static str {
        "tiktok"
    }

    fn record(&self, event: TrackingEvent) {
        let name = event.tiktok_name();
        let Some(ttq) = vendor_global("ttq") else {
            debug!("TikTok pixel not loaded, dropping {}", name);
            return;
        };
        let track = Reflect::get(&ttq, &JsValue::from_str("track"))
            .ok()
            .and_then(|track| track.dyn_into::<Function>().ok());
        match track {
            Some(track) => report_failure(self.name(), name, track.call1(&ttq, &JsValue::from_str(name))),
            None => debug!("ttq.track missing, dropping {}", name),
        }
    }
}

/// `window.snaptr("track", name)`
pub struct SnapPixel;

impl TrackingCollector for SnapPixel {
    fn name(&self) -> &'static str {
        "snapchat"
    }

    fn record(&self, event: TrackingEvent) {
        let name = event.snapchat_name();
        let Some(snaptr) = vendor_global("snaptr").and_then(|value| value.dyn_into::<Function>().ok()) else {
            debug!("Snap pixel not loaded, dropping {}", name);
            return;
        };
        report_failure(
            self.name(),
            name,
            snaptr.call2(&JsValue::NULL, &JsValue::from_str("track"), &JsValue::from_str(name)),
        );
    }
}

/// Every collector the page reports to. Cloning shares the same list.
#[derive(Clone)]
pub struct Collectors(Rc<Vec<Box<dyn TrackingCollector>>>);

impl Collectors {
    pub fn new(collectors: Vec<Box<dyn TrackingCollector>>) -> Self {
        Self(Rc::new(collectors))
    }

    pub fn vendor_pixels() -> Self {
        Self::new(vec![Box::new(TikTokPixel), Box::new(SnapPixel)])
    }

    pub fn record(&self, event: TrackingEvent) {
        for collector in self.0.iter() {
            debug!("Recording {:?} to {}", event, collector.name());
            collector.record(event);
        }
    }
}

impl Default for Collectors {
    fn default() -> Self {
        Self::new(vec![Box::new(NullCollector)])
    }
}

impl PartialEq for Collectors {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
pub mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Collects events in memory, shared with the test through an `Rc`.
    #[derive(Clone, Default)]
    pub struct RecordingCollector(pub Rc<RefCell<Vec<TrackingEvent>>>);

    impl TrackingCollector for RecordingCollector {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn record(&self, event: TrackingEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    #[test]
    fn snapchat_vocabulary() {
        assert_eq!(TrackingEvent::ViewContent.snapchat_name(), "PAGE_VIEW");
        assert_eq!(TrackingEvent::SubmitForm.snapchat_name(), "VIEW_CONTENT");
        assert_eq!(TrackingEvent::ClickButton.snapchat_name(), "AD_CLICK");
    }

    #[test]
    fn tiktok_vocabulary_matches_event_names() {
        assert_eq!(TrackingEvent::ViewContent.tiktok_name(), "ViewContent");
        assert_eq!(TrackingEvent::SubmitForm.tiktok_name(), "SubmitForm");
        assert_eq!(TrackingEvent::ClickButton.tiktok_name(), "ClickButton");
    }

    #[test]
    fn fan_out_reaches_every_collector() {
        let first = RecordingCollector::default();
        let second = RecordingCollector::default();
        let collectors = Collectors::new(vec![Box::new(first.clone()), Box::new(second.clone())]);

        collectors.record(TrackingEvent::SubmitForm);

        assert_eq!(*first.0.borrow(), vec![TrackingEvent::SubmitForm]);
        assert_eq!(*second.0.borrow(), vec![TrackingEvent::SubmitForm]);
    }

    #[test]
    fn default_and_empty_sets_are_silent() {
        Collectors::default().record(TrackingEvent::ClickButton);
        Collectors::new(Vec::new()).record(TrackingEvent::ViewContent);
    }

    #[test]
    fn equality_is_by_shared_list() {
        let collectors = Collectors::default();
        assert!(collectors == collectors.clone());
        assert!(collectors != Collectors::default());
    }
}
