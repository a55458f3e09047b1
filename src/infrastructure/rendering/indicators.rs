//! Indicator draw routines and their fixed paint order.
//!
//! Every routine receives the same immutable [`LayerInput`]; none of them can
//! mutate display state. Routines that are toggled off in the config, or that
//! lack the data they need, draw nothing and return `Ok`.

use std::f64::consts::TAU;

use super::context::{DrawingContext, font};
use crate::domain::display::{DisplayConfig, DisplayState};
use crate::domain::errors::RenderingError;
use crate::domain::geometry::RenderGeometry;
use crate::domain::market::{DistributionProfile, PriceScale, VolatilityReading};

/// Colours used by the layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: &'static str,
    pub profile: &'static str,
    pub meter_track: &'static str,
    pub meter_fill: &'static str,
    pub adr_bound: &'static str,
    pub orb: &'static str,
    pub price_line: &'static str,
    pub float_fill: &'static str,
    pub float_text: &'static str,
    pub metric_text: &'static str,
    pub marker: &'static str,
    pub hover: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#111827",
            profile: "#374151",
            meter_track: "#1f2937",
            meter_fill: "#60a5fa",
            adr_bound: "#f59e0b",
            orb: "#a78bfa",
            price_line: "#e5e7eb",
            float_fill: "#1e3a5f",
            float_text: "#f9fafb",
            metric_text: "#9ca3af",
            marker: "#f472b6",
            hover: "#6b7280",
        }
    }
}

/// Everything a layer may read for one frame
pub struct LayerInput<'a> {
    pub geometry: &'a RenderGeometry,
    pub scale: &'a PriceScale,
    pub config: &'a DisplayConfig,
    pub state: &'a DisplayState,
    pub profile: &'a DistributionProfile,
    pub volatility: Option<VolatilityReading>,
    /// Marker prices shared across displays.
    pub markers: &'a [f64],
    /// Pointer y within the canvas, CSS px.
    pub hover_y: Option<f64>,
    pub palette: &'a Palette,
}

pub type LayerFn = fn(&mut dyn DrawingContext, &LayerInput<'_>) -> Result<(), RenderingError>;

#[derive(Clone, Copy)]
pub struct Layer {
    pub name: &'static str,
    pub draw: LayerFn,
}

/// Paint order, back to front.
pub const LAYERS: [Layer; 8] = [
    Layer { name: "profile", draw: draw_profile },
    Layer { name: "range_meter", draw: draw_range_meter },
    Layer { name: "volatility_orb", draw: draw_volatility_orb },
    Layer { name: "price_line", draw: draw_price_line },
    Layer { name: "price_float", draw: draw_price_float },
    Layer { name: "volatility_metric", draw: draw_volatility_metric },
    Layer { name: "markers", draw: draw_markers },
    Layer { name: "hover", draw: draw_hover },
];

pub fn format_price(price: f64, precision: u8) -> String {
    format!("{:.*}", usize::from(precision.min(DisplayConfig::MAX_PRECISION)), price)
}

fn draw_profile(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    let max = input.profile.max_count();
    if !input.config.show_profile || max == 0 {
        return Ok(());
    }
    let g = input.geometry;
    ctx.set_fill_style(input.palette.profile);
    for (idx, count) in input.profile.buckets.iter().enumerate().filter(|(_, c)| **c > 0) {
        let (lo, hi) = input.profile.bucket_bounds(idx);
        let y_top = input.scale.price_to_y(hi);
        let height = (input.scale.price_to_y(lo) - y_top).max(1.0);
        let width = f64::from(*count) / f64::from(max) * g.profile_width;
        ctx.fill_rect(g.axis_x - width, y_top, width, height);
    }
    Ok(())
}

fn draw_range_meter(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    if !input.config.show_range_meter {
        return Ok(());
    }
    let g = input.geometry;
    let s = input.scale;
    let x = g.content_width - g.meter_width;
    ctx.set_fill_style(input.palette.meter_track);
    ctx.fill_rect(x, 0.0, g.meter_width, g.content_height);

    if let (Some(high), Some(low)) = (input.state.todays_high, input.state.todays_low) {
        let top = s.price_to_y(high);
        ctx.set_fill_style(input.palette.meter_fill);
        ctx.fill_rect(x, top, g.meter_width, (s.price_to_y(low) - top).max(1.0));
    }

    ctx.set_stroke_style(input.palette.adr_bound);
    ctx.set_line_width(1.0);
    for bound in [input.state.projected_adr_high, input.state.projected_adr_low].into_iter().flatten() {
        let y = s.price_to_y(bound);
        ctx.line(x - g.meter_width, y, g.content_width, y);
    }
    if let Some(open) = input.state.day_open_price {
        let y = s.price_to_y(open);
        ctx.set_stroke_style(input.palette.price_line);
        ctx.line(x, y, g.content_width, y);
    }
    Ok(())
}

fn draw_volatility_orb(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    let (Some(reading), Some(price)) = (input.volatility, input.state.current_price) else {
        return Ok(());
    };
    if !input.config.show_volatility {
        return Ok(());
    }
    let g = input.geometry;
    let radius = g.orb_base_width / 2.0 * (0.5 + reading.intensity);
    ctx.set_global_alpha(0.25 + 0.5 * reading.intensity);
    ctx.set_fill_style(input.palette.orb);
    ctx.begin_path();
    ctx.arc(g.axis_x, input.scale.price_to_y(price), radius.max(1.0), 0.0, TAU)?;
    ctx.fill();
    ctx.set_global_alpha(1.0);
    Ok(())
}

fn draw_price_line(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    let Some(price) = input.state.current_price else {
        return Ok(());
    };
    let y = input.scale.price_to_y(price);
    ctx.set_stroke_style(input.palette.price_line);
    ctx.set_line_width(1.0);
    ctx.line(0.0, y, input.geometry.axis_x, y);
    Ok(())
}

fn draw_price_float(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    let Some(price) = input.state.current_price else {
        return Ok(());
    };
    let g = input.geometry;
    let top = (input.scale.price_to_y(price) - g.float_height / 2.0)
        .clamp(0.0, (g.content_height - g.float_height).max(0.0));

    ctx.set_fill_style(input.palette.float_fill);
    ctx.fill_rect(g.float_x(), top, g.float_width, g.float_height);
    ctx.set_fill_style(input.palette.float_text);
    ctx.set_font(&font(g.price_font_size, "bold"));
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    let padding = g.float_height * 0.15;
    ctx.fill_text(
        &format_price(price, input.config.price_precision),
        g.float_x() + padding,
        top + g.float_height / 2.0,
    )
}

fn draw_volatility_metric(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    let Some(reading) = input.volatility else {
        return Ok(());
    };
    if !input.config.show_volatility_metric {
        return Ok(());
    }
    let g = input.geometry;
    ctx.set_fill_style(input.palette.metric_text);
    ctx.set_font(&font(g.metric_font_size, "normal"));
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    ctx.fill_text(&format!("vol {:.0}%", reading.intensity * 100.0), 4.0, 4.0)
}

fn draw_markers(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    if !input.config.show_markers || input.markers.is_empty() {
        return Ok(());
    }
    let g = input.geometry;
    ctx.set_stroke_style(input.palette.marker);
    ctx.set_line_width(1.0);
    ctx.set_line_dash(&[4.0, 3.0])?;
    for price in input.markers {
        let y = input.scale.price_to_y(*price);
        if (0.0..=g.content_height).contains(&y) {
            ctx.line(0.0, y, g.content_width, y);
        }
    }
    ctx.set_line_dash(&[])
}

fn draw_hover(ctx: &mut dyn DrawingContext, input: &LayerInput<'_>) -> Result<(), RenderingError> {
    let Some(y) = input.hover_y.filter(|y| y.is_finite()) else {
        return Ok(());
    };
    let g = input.geometry;
    ctx.set_stroke_style(input.palette.hover);
    ctx.set_line_width(1.0);
    ctx.line(0.0, y, g.content_width, y);
    ctx.set_fill_style(input.palette.metric_text);
    ctx.set_font(&font(g.metric_font_size, "normal"));
    ctx.set_text_align("right");
    ctx.set_text_baseline("bottom");
    let price = input.scale.y_to_price(y);
    ctx.fill_text(&format_price(price, input.config.price_precision), g.content_width - 2.0, y - 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_order_is_back_to_front() {
        let names: Vec<&str> = LAYERS.iter().map(|l| l.name).collect();
        assert_eq!(
            names,
            [
                "profile",
                "range_meter",
                "volatility_orb",
                "price_line",
                "price_float",
                "volatility_metric",
                "markers",
                "hover"
            ]
        );
    }

    #[test]
    fn price_precision_is_bounded() {
        assert_eq!(format_price(1.234567891234, 3), "1.235");
        assert_eq!(format_price(1.0, 20), "1.00000000");
    }
}
