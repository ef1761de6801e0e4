use surfplot_core::{linspace, ColorMap, Grid, PlotError, PlotParams, Surface};

#[test]
fn default_grid_spans_bounds() {
    let grid = Grid::from_params(&PlotParams::default());
    let xs = grid.xs();
    assert_eq!(xs.len(), 20);
    assert_eq!(xs[0], -50.0);
    assert_eq!(xs[19], 50.0);
    assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn linspace_edge_cases() {
    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(linspace(1.0, -1.0, 3), vec![1.0, 0.0, -1.0]);
    assert_eq!(linspace(2.0, 2.0, 3), vec![2.0, 2.0, 2.0]);
}

#[test]
fn meshgrid_rows_follow_y() {
    let grid = Grid::new(vec![0.0, 1.0, 2.0], vec![10.0, 20.0]);
    let (x, y) = grid.meshgrid();
    assert_eq!(x.shape(), &[2, 3]);
    assert_eq!(x[[1, 2]], 2.0);
    assert_eq!(y[[1, 2]], 20.0);
}

#[test]
fn surface_evaluates_over_grid() {
    let params = PlotParams {
        xmin: -1.0,
        xmax: 1.0,
        ymin: -1.0,
        ymax: 1.0,
        resolution: 3,
        function: "x**2 + y**2".to_string(),
        ..PlotParams::default()
    };
    let surface = Surface::sample(&params).unwrap();
    assert_eq!(surface.z().shape(), &[3, 3]);
    assert_eq!(surface.z()[[1, 1]], 0.0);
    assert_eq!(surface.z()[[0, 2]], 2.0);
    assert_eq!(surface.z_range(), Some((0.0, 2.0)));
}

#[test]
fn sampling_is_deterministic() {
    let params = PlotParams {
        function: "sin(x / 10) * cos(y / 10)".to_string(),
        ..PlotParams::default()
    };
    let first = Surface::sample(&params).unwrap();
    let second = Surface::sample(&params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn non_finite_values_are_excluded_from_range() {
    let params = PlotParams {
        xmin: -1.0,
        xmax: 1.0,
        resolution: 3,
        function: "1 / x".to_string(),
        ..PlotParams::default()
    };
    let surface = Surface::sample(&params).unwrap();
    assert_eq!(surface.z_range(), Some((-1.0, 1.0)));
}

#[test]
fn non_positive_resolution_gives_empty_grid() {
    let params = PlotParams {
        resolution: -4,
        ..PlotParams::default()
    };
    let surface = Surface::sample(&params).unwrap();
    assert!(surface.grid().is_empty());
    assert_eq!(surface.z_range(), None);
}

#[test]
fn bad_function_text_is_a_plot_error() {
    let params = PlotParams {
        function: "x + undefined_name".to_string(),
        ..PlotParams::default()
    };
    assert!(matches!(
        Surface::sample(&params),
        Err(PlotError::Expression(_))
    ));
}

#[test]
fn color_map_index_four_is_jet() {
    let params = PlotParams {
        cmap_index: 4,
        ..PlotParams::default()
    };
    assert_eq!(params.color_map().unwrap(), ColorMap::Jet);
    assert_eq!(ColorMap::Jet.name(), "jet");
}

#[test]
fn color_map_order_is_fixed() {
    assert_eq!(
        ColorMap::names(),
        vec!["viridis", "plasma", "inferno", "magma", "jet", "coolwarm"]
    );
    assert_eq!("Coolwarm".parse::<ColorMap>().unwrap().index(), 5);
    assert!(ColorMap::from_index(6).is_none());
    assert!(ColorMap::from_index(-1).is_none());
    assert!(matches!(
        PlotParams { cmap_index: 9, ..PlotParams::default() }.color_map(),
        Err(PlotError::UnknownColorMap(9))
    ));
}
