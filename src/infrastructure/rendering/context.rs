use crate::domain::errors::RenderingError;

/// The subset of the Canvas 2D API the indicator layers draw with.
///
/// Implemented for the browser canvas in [`super::canvas::CanvasSurface`];
/// tests provide recording implementations.
pub trait DrawingContext {
    /// Current backing-store size in physical pixels.
    fn backing_size(&self) -> (u32, u32);
    /// Rewrite the backing-store size. Resets the context state as a side effect.
    fn resize_backing_store(&mut self, width: u32, height: u32);

    fn reset_transform(&mut self) -> Result<(), RenderingError>;
    fn scale(&mut self, x: f64, y: f64) -> Result<(), RenderingError>;
    fn save(&mut self);
    fn restore(&mut self);

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), RenderingError>;
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderingError>;
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderingError>;

    /// One straight stroked segment.
    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.begin_path();
        self.move_to(x0, y0);
        self.line_to(x1, y1);
        self.stroke();
    }
}

/// CSS font shorthand for a pixel size.
pub fn font(size_px: f64, weight: &str) -> String {
    format!("{} {:.1}px monospace", weight, size_px.max(1.0))
}
