use crate::canvas::axes::{Axes3d, ViewState};
use crate::canvas::RenderError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::cmp::Reverse;
use std::fmt::Display;
use std::path::Path;

fn draw_failed(err: impl Display) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Draws the axes box, the surfaces and the axis labels onto `root`.
///
/// Plotters has no depth buffer, so every surface is split into cells that
/// are painted back to front using the chart's own projection.
pub(crate) fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    axes: &Axes3d,
    view: &ViewState,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_failed)?;

    let limits = axes.limits();
    let (x0, x1) = limits.x;
    let (y0, y1) = limits.y;
    let (z0, z1) = limits.z;

    // Plotters' vertical axis is the second one, so data z goes in the middle.
    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .build_cartesian_3d(x0..x1, z0..z1, y0..y1)
        .map_err(draw_failed)?;
    chart.with_projection(|mut pb| {
        pb.yaw = view.yaw;
        pb.pitch = view.pitch;
        pb.scale = view.scale;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()
        .map_err(draw_failed)?;

    for artist in axes.surfaces() {
        let mut cells = artist.cells(limits.z);
        let coord = chart.as_coord_spec();
        cells.sort_by_cached_key(|cell| {
            let (x, y, z) = cell.center();
            Reverse(coord.projected_depth(&x, &z, &y))
        });

        let style = artist.style;
        let edge = style.edge_color.map(|(r, g, b)| {
            let stroke = style.line_width.ceil().max(1.0);
            let alpha = (style.line_width / stroke).clamp(0.15, 1.0);
            RGBColor(r, g, b).mix(alpha).stroke_width(stroke as u32)
        });

        for cell in &cells {
            let (r, g, b) = style.cmap.sample(cell.t);
            let corners: Vec<(f64, f64, f64)> =
                cell.corners.iter().map(|&(x, y, z)| (x, z, y)).collect();
            if let Some(edge) = &edge {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        corners.clone(),
                        RGBColor(r, g, b).filled(),
                    )))
                    .map_err(draw_failed)?;
                let mut outline = corners;
                outline.push(outline[0]);
                chart
                    .draw_series(std::iter::once(PathElement::new(outline, edge.clone())))
                    .map_err(draw_failed)?;
            } else {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        corners,
                        RGBColor(r, g, b).filled(),
                    )))
                    .map_err(draw_failed)?;
            }
        }
    }

    let [xlabel, ylabel, zlabel] = axes.labels();
    let label_style = ("sans-serif", 16).into_font().color(&BLACK);
    let placements = [
        (xlabel, ((x0 + x1) / 2.0, z0, y1)),
        (ylabel, (x1, z0, (y0 + y1) / 2.0)),
        (zlabel, (x0, z1, y1)),
    ];
    for (text, position) in placements {
        if text.is_empty() {
            continue;
        }
        chart
            .draw_series(std::iter::once(Text::new(
                text.to_string(),
                position,
                label_style.clone(),
            )))
            .map_err(draw_failed)?;
    }
    Ok(())
}

/// Renders into a packed RGB buffer of `size.0 * size.1 * 3` bytes.
pub(crate) fn rasterize(
    axes: &Axes3d,
    view: &ViewState,
    size: (u32, u32),
) -> Result<Vec<u8>, RenderError> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyFigure(width, height));
    }
    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        draw_figure(&root, axes, view)?;
        root.present().map_err(draw_failed)?;
    }
    Ok(buffer)
}

pub(crate) fn export_png(
    axes: &Axes3d,
    view: &ViewState,
    path: &Path,
    size: (u32, u32),
) -> Result<(), RenderError> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyFigure(width, height));
    }
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw_figure(&root, axes, view)?;
    root.present().map_err(draw_failed)?;
    Ok(())
}
