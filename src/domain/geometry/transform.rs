use serde::Serialize;

use crate::domain::display::DisplayConfig;

/// Smallest container edge geometry is derived for.
pub const MIN_CONTAINER_PX: f64 = 1.0;

/// Pixel layout of one display for the current frame, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderGeometry {
    pub container_width: f64,
    pub container_height: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub axis_x: f64,
    pub float_width: f64,
    pub float_height: f64,
    pub float_x_offset: f64,
    pub price_font_size: f64,
    pub metric_font_size: f64,
    pub orb_base_width: f64,
    pub profile_width: f64,
    pub meter_width: f64,
}

impl RenderGeometry {
    /// Left edge of the price float, anchored to the axis.
    pub fn float_x(&self) -> f64 {
        self.axis_x + self.float_x_offset
    }
}

/// Reference-canvas scaling from a percentage config to pixels
pub struct CoordinateTransform;

impl CoordinateTransform {
    /// Pure: the same inputs always give bit-identical geometry. Device pixel ratio is
    /// deliberately absent; it only affects the backing store.
    pub fn scale(config: &DisplayConfig, container_width: f64, container_height: f64) -> RenderGeometry {
        let w = sanitize_axis(container_width);
        let h = sanitize_axis(container_height);

        RenderGeometry {
            container_width: w,
            container_height: h,
            content_width: config.content_width.resolve(w),
            content_height: config.content_height.resolve(h),
            axis_x: config.axis_x.resolve(w),
            float_width: config.float_width.resolve(w),
            float_height: config.float_height.resolve(h),
            float_x_offset: config.float_x_offset.resolve(w),
            price_font_size: config.price_font_size.resolve(h),
            metric_font_size: config.metric_font_size.resolve(h),
            orb_base_width: config.orb_base_width.resolve(w),
            profile_width: config.profile_width.resolve(w),
            meter_width: config.meter_width.resolve(w),
        }
    }
}

fn sanitize_axis(px: f64) -> f64 {
    if px.is_finite() { px.max(MIN_CONTAINER_PX) } else { MIN_CONTAINER_PX }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::display::Dimension;

    #[test]
    fn percent_fields_follow_their_axis() {
        let config = DisplayConfig::default();
        let g = CoordinateTransform::scale(&config, 200.0, 100.0);
        assert_eq!(g.axis_x, 124.0);
        assert_eq!(g.float_height, 18.0);
        assert_eq!(g.price_font_size, 15.0);
    }

    #[test]
    fn absolute_fields_pass_through() {
        let config = DisplayConfig { axis_x: Dimension::Absolute(300.0), ..DisplayConfig::default() };
        let small = CoordinateTransform::scale(&config, 200.0, 100.0);
        let large = CoordinateTransform::scale(&config, 800.0, 400.0);
        assert_eq!(small.axis_x, 300.0);
        assert_eq!(large.axis_x, 300.0);
    }

    #[test]
    fn invalid_container_clamps_to_one_pixel() {
        let g = CoordinateTransform::scale(&DisplayConfig::default(), f64::NAN, -5.0);
        assert_eq!(g.container_width, MIN_CONTAINER_PX);
        assert_eq!(g.container_height, MIN_CONTAINER_PX);
        assert!(g.axis_x.is_finite());
    }
}
