use std::fmt::Debug;

use serde::Serialize;

/// A closed set of panels. `Default` is the panel shown on mount.
pub trait Tab: Copy + Eq + Debug + Default + 'static {
    /// Every member, in display order.
    const ALL: &'static [Self];

    fn key(&self) -> &'static str;

    fn label(&self) -> &'static str;
}

/// Panels of the stock detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockTab {
    #[default]
    Overview,
    Prediction,
    News,
    Financials,
}

impl Tab for StockTab {
    const ALL: &'static [Self] = &[
        StockTab::Overview,
        StockTab::Prediction,
        StockTab::News,
        StockTab::Financials,
    ];

    fn key(&self) -> &'static str {
        match self {
            StockTab::Overview => "overview",
            StockTab::Prediction => "prediction",
            StockTab::News => "news",
            StockTab::Financials => "financials",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StockTab::Overview => "Overview",
            StockTab::Prediction => "AI Prediction",
            StockTab::News => "News",
            StockTab::Financials => "Financials",
        }
    }
}

/// Exactly one active tab. Lives as long as its page; a remount starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabState<T: Tab> {
    active: T,
}

impl<T: Tab> TabState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> T {
        self.active
    }

    /// Always succeeds and takes effect immediately.
    pub fn set_active(&mut self, tab: T) {
        self.active = tab;
    }

    pub fn is_active(&self, tab: T) -> bool {
        self.active == tab
    }

    pub fn options(&self) -> Vec<TabOption> {
        T::ALL
            .iter()
            .map(|tab| TabOption {
                key: tab.key(),
                label: tab.label(),
                active: self.is_active(*tab),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabOption {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// At most one open item, e.g. the confidence tooltip of a prediction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disclosure {
    open: Option<usize>,
}

impl Disclosure {
    /// Open `index`, or close it if it is already open.
    pub fn toggle(&mut self, index: usize) {
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }
}
