//! Plotly figure documents for the dashboard panels.
//!
//! Figures are plain serde values; the page hands them to Plotly.js as-is.

use crate::types::{CountOrder, Dataset, PriceCeiling, WineRecord};
use serde::Serialize;

/// Plotly's sequential RdBu scale, used as a discrete colour cycle.
pub const RDBU: [&str; 11] = [
    "rgb(103,0,31)",
    "rgb(178,24,43)",
    "rgb(214,96,77)",
    "rgb(244,165,130)",
    "rgb(253,219,199)",
    "rgb(247,247,247)",
    "rgb(209,229,240)",
    "rgb(146,197,222)",
    "rgb(67,147,195)",
    "rgb(33,102,172)",
    "rgb(5,48,97)",
];

const SLICE_BORDER_WIDTH: f64 = 4.0;
const SLICE_OPACITY: f64 = 0.85;
const MAP_MAX_MARKER_PX: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn title(&self) -> &str {
        &self.layout.title.text
    }

    /// Countries shown by the figure, in trace order.
    pub fn labels(&self) -> Vec<&str> {
        self.data
            .iter()
            .flat_map(|trace| match trace {
                Trace::Pie(pie) => pie.labels.iter().map(String::as_str).collect::<Vec<_>>(),
                Trace::Bar(bar) => bar.x.iter().map(String::as_str).collect(),
                Trace::Scattergeo(geo) => geo.locations.iter().map(String::as_str).collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Bar(BarTrace),
    Scattergeo(GeoTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub textinfo: &'static str,
    pub opacity: f64,
    pub marker: PieMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<&'static str>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker: BarMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMarker {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoTrace {
    pub locations: Vec<String>,
    pub locationmode: &'static str,
    pub hovertext: Vec<String>,
    pub mode: &'static str,
    pub marker: GeoMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMarker {
    pub size: Vec<f64>,
    pub sizemode: &'static str,
    pub sizeref: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    pub projection: Projection,
    pub showcountries: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Large-font layout, after Plotly's "presentation" template.
fn presentation(title: String) -> Layout {
    Layout {
        title: Title { text: title },
        font: Font { size: 18 },
        xaxis: None,
        yaxis: None,
        geo: None,
    }
}

fn color_at(i: usize) -> &'static str {
    RDBU[i % RDBU.len()]
}

pub fn price_title(ceiling: PriceCeiling) -> String {
    match ceiling {
        PriceCeiling::All => "5 countries with the highest average price".to_string(),
        PriceCeiling::UpTo(limit) => {
            format!("5 countries with the highest average price up to ${}", limit)
        }
    }
}

pub fn count_title(order: CountOrder) -> &'static str {
    match order {
        CountOrder::Fewest => "5 countries with fewest wines",
        CountOrder::Most => "5 countries with most wines",
    }
}

fn styled_pie(labels: Vec<String>, values: Vec<f64>) -> Trace {
    let colors = (0..labels.len()).map(color_at).collect();
    Trace::Pie(PieTrace {
        labels,
        values,
        textinfo: "percent",
        opacity: SLICE_OPACITY,
        marker: PieMarker {
            colors,
            line: Line { color: "black", width: SLICE_BORDER_WIDTH },
        },
    })
}

pub fn price_pie(rows: &[&WineRecord], ceiling: PriceCeiling) -> Figure {
    let labels = rows.iter().map(|r| r.country.clone()).collect();
    let values = rows.iter().map(|r| r.average_price).collect();
    Figure {
        data: vec![styled_pie(labels, values)],
        layout: presentation(price_title(ceiling)),
    }
}

/// One trace per country so each bar gets its own colour and legend entry.
pub fn price_bar(rows: &[&WineRecord], ceiling: PriceCeiling) -> Figure {
    let data = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Trace::Bar(BarTrace {
                name: r.country.clone(),
                x: vec![r.country.clone()],
                y: vec![r.average_price],
                marker: BarMarker { color: color_at(i) },
            })
        })
        .collect();

    let mut layout = presentation(price_title(ceiling));
    layout.xaxis = Some(Axis { title: Title { text: "Country".to_string() } });
    layout.yaxis = Some(Axis { title: Title { text: "Average price".to_string() } });
    Figure { data, layout }
}

pub fn count_pie(rows: &[&WineRecord], order: CountOrder) -> Figure {
    let labels = rows.iter().map(|r| r.country.clone()).collect();
    // counts stay far below 2^53 so the conversion is exact
    let values = rows.iter().map(|r| r.count as f64).collect();
    Figure {
        data: vec![styled_pie(labels, values)],
        layout: presentation(count_title(order).to_string()),
    }
}

/// World map with one bubble per country, area proportional to its wine count.
pub fn bubble_map(dataset: &Dataset) -> Figure {
    let records = dataset.records();
    let size: Vec<f64> = records.iter().map(|r| r.count as f64).collect();
    let largest = size.iter().copied().fold(0.0_f64, f64::max).max(1.0);

    let trace = GeoTrace {
        locations: records.iter().map(|r| r.country.clone()).collect(),
        locationmode: "country names",
        hovertext: records.iter().map(|r| r.country.clone()).collect(),
        mode: "markers",
        marker: GeoMarker {
            size,
            sizemode: "area",
            // Plotly's area sizing: the largest value maps to MAP_MAX_MARKER_PX
            sizeref: 2.0 * largest / (MAP_MAX_MARKER_PX * MAP_MAX_MARKER_PX),
            color: RDBU[0],
        },
    };

    let mut layout = presentation(String::new());
    layout.geo = Some(Geo {
        projection: Projection { kind: "orthographic" },
        showcountries: true,
    });
    Figure { data: vec![Trace::Scattergeo(trace)], layout }
}
