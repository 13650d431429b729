use super::*;
use crate::cost::Predictor;

const P8: Precision = Precision::DEFAULT;

fn cost(s: f64, b: f64) -> Line {
    Line::Cost {
        slope: s,
        intercept: b,
    }
}

fn base_predictors() -> Vec<Predictor> {
    vec![
        Predictor::new("PolyPhen-2", 0.926, 0.638, 0.909),
        Predictor::new("SIFT", 0.924, 0.682, 0.866),
        Predictor::new("CADD", 0.995, 0.254, 1.0),
    ]
}

fn close(a: Point, x: f64, y: f64) -> bool {
    (a.x - x).abs() < 1e-13 && (a.y - y).abs() < 1e-13
}

#[test]
fn candidate_lines_skip_boundary_duplicates() {
    let preds = vec![
        Predictor::new("p1", 0.0, 0.0, 0.0),
        Predictor::new("p2", 1.0, 1.0, 1.0),
        Predictor::new("p3", 0.0, 0.0, 0.5),
    ];
    let lines = candidate_lines(0.5, &preds, P8);
    assert_eq!(lines, vec![cost(-1.0, 0.66666667), cost(-1.0, 2.0)]);
}

#[test]
fn candidate_lines_dedupe_in_first_occurrence_order() {
    let preds = vec![
        Predictor::new("a", 0.9, 0.8, 1.0),
        Predictor::new("b", 0.7, 0.9, 1.0),
        Predictor::new("c", 0.9, 0.8, 1.0),
    ];
    let lines = candidate_lines(0.3, &preds, P8);
    // a-b and c-b give the same line, a-c has parallel planes
    assert_eq!(lines.len(), 1);
}

#[test]
fn line_intersection_cases() {
    let l = cost(-0.5, 0.4);
    assert_eq!(line_intersection(l, Line::YAxis, P8), Some(Point::new(0.0, 0.4)));
    assert_eq!(line_intersection(Line::XAxis, l, P8), Some(Point::new(0.8, 0.0)));
    // crosses the hypotenuse only outside the triangle
    assert_eq!(line_intersection(l, Line::Hypotenuse, P8), None);
    // horizontal lines never reach the x axis
    assert_eq!(line_intersection(cost(0.0, 0.3), Line::XAxis, P8), None);
    // parallel cost lines
    assert_eq!(line_intersection(l, cost(-0.5, 0.1), P8), None);
    assert_eq!(
        line_intersection(Line::YAxis, Line::Hypotenuse, P8),
        Some(Point::TOP)
    );
    let p = line_intersection(cost(1.0, 0.0), cost(-1.0, 0.5), P8).unwrap();
    assert_eq!(p, Point::new(0.25, 0.25));
    // crossing beyond x + y = 1 is outside
    assert_eq!(line_intersection(cost(1.0, 0.0), cost(-1.0, 1.5), P8), None);
}

#[test]
fn raw_nodes_of_base_case() {
    let lines = candidate_lines(0.5, &base_predictors(), P8);
    assert_eq!(
        lines,
        vec![
            cost(-0.62611871, 0.61573709),
            cost(-0.19990917, 0.30386916),
            cost(-0.28050451, 0.36284274)
        ]
    );
    let nodes = intersection_nodes(&lines, P8);
    assert_eq!(nodes.len(), 11);
    // all three cost lines collide on one rounded point
    assert_eq!(nodes[&Point::new(0.73172442, 0.15759074)].len(), 3);
    assert_eq!(nodes[&Point::new(0.73172444, 0.15759073)].len(), 2);
}

#[test]
fn unmerge_splits_rounded_triple_point() {
    let lines = candidate_lines(0.5, &base_predictors(), P8);
    let nodes = unmerge_nodes(intersection_nodes(&lines, P8));
    assert_eq!(nodes.len(), 12);
    assert!(!nodes.contains_key(&Point::new(0.73172442, 0.15759074)));
    // the stale 2-line node of the same pair is replaced too
    assert!(!nodes.contains_key(&Point::new(0.73172444, 0.15759073)));
    let fine: Vec<Point> = nodes
        .keys()
        .copied()
        .filter(|p| p.x > 0.7 && p.x < 0.8)
        .collect();
    assert_eq!(fine.len(), 3);
    assert!(close(fine[0], 0.73172441988784, 0.157590740144327));
    assert!(close(fine[1], 0.731724423625055, 0.157590737804387));
    assert!(close(fine[2], 0.731724439651225, 0.157590734600608));
    assert!(fine.iter().all(|p| nodes[p].len() == 2));
}

#[test]
fn unmerge_keeps_true_coincidences() {
    let (a, b) = (cost(-0.5, 0.5), cost(-0.9, 0.5));
    let mut nodes = corner_nodes();
    nodes.insert(Point::new(0.0, 0.5), [a, b, Line::YAxis].into());
    let (c, d) = (cost(0.3, 0.0), cost(0.7, 0.0));
    nodes
        .get_mut(&Point::ORIGIN)
        .unwrap()
        .extend([c, d]);
    let out = unmerge_nodes(nodes.clone());
    assert_eq!(out, nodes);
}

#[test]
fn base_case_arrangement() {
    let arr = build_arrangement(0.5, &base_predictors(), P8).unwrap();
    assert_eq!(arr.nodes.len(), 12);
    assert!(arr.nodes.values().all(|l| l.len() >= 2));
    assert_eq!(
        arr.lines[&Line::YAxis],
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.30386916),
            Point::new(0.0, 0.36284274),
            Point::new(0.0, 0.61573709),
            Point::new(0.0, 1.0),
        ]
    );
    assert_eq!(
        arr.lines[&Line::XAxis],
        vec![Point::ORIGIN, Point::new(0.98341909, 0.0), Point::RIGHT]
    );
    assert_eq!(
        arr.lines[&Line::Hypotenuse],
        vec![
            Point::TOP,
            Point::new(0.87006477, 0.12993523),
            Point::new(0.88556116, 0.11443884),
            Point::RIGHT,
        ]
    );
    let on_first = &arr.lines[&cost(-0.62611871, 0.61573709)];
    assert_eq!(on_first.len(), 4);
    assert_eq!(on_first[0], Point::new(0.0, 0.61573709));
    assert!(close(on_first[1], 0.73172441988784, 0.157590740144327));
    assert!(close(on_first[2], 0.731724423625055, 0.157590737804387));
    assert_eq!(on_first[3], Point::new(0.98341909, 0.0));
}

#[test]
fn near_parallel_lines_keep_distinct_axis_nodes() {
    let preds = vec![
        Predictor::new("p1", 0.0, 0.0, 0.0),
        Predictor::new("p2", 0.0, 0.0, 0.003),
        Predictor::new("p3", 0.0, 0.003, 0.003),
    ];
    let arr = build_arrangement(0.5, &preds, P8).unwrap();
    let x_axis = &arr.lines[&Line::XAxis];
    assert_eq!(x_axis.len(), 4);
    assert!(close(x_axis[1], 0.666666666666667, 0.0));
    assert_eq!(x_axis[2], Point::new(0.66666667, 0.0));
    assert_eq!(
        arr.lines[&Line::YAxis],
        vec![
            Point::ORIGIN,
            Point::new(0.0, 0.66666667),
            Point::new(0.0, 0.667334),
            Point::TOP,
        ]
    );
    let steep = &arr.lines[&cost(-1.001001, 0.667334)];
    assert_eq!(steep.len(), 3);
    assert!(close(steep[1], 0.666663336663283, 3.333336715e-06));
}

#[test]
fn line_parallel_to_hypotenuse_meets_both_axes() {
    let preds = vec![
        Predictor::new("p1", 0.0, 0.0, 0.0),
        Predictor::new("p2", 1.0, 1.0, 1.0),
        Predictor::new("p3", 0.0, 0.0, 0.5),
    ];
    let arr = build_arrangement(0.5, &preds, P8).unwrap();
    assert_eq!(arr.nodes.len(), 5);
    assert_eq!(
        arr.lines[&cost(-1.0, 0.66666667)],
        vec![Point::new(0.0, 0.66666667), Point::new(0.66666667, 0.0)]
    );
    assert_eq!(arr.lines[&Line::Hypotenuse], vec![Point::TOP, Point::RIGHT]);
}

#[test]
fn sorting_fails_when_no_origin_rule_applies() {
    let mut lines = LineMap::new();
    lines.insert(
        cost(1.0, 1.0),
        vec![
            Point::new(0.0, 0.1),
            Point::new(0.0, 0.2),
            Point::new(0.1, 0.0),
            Point::new(0.2, 0.0),
        ],
    );
    let err = sort_line_nodes(lines).unwrap_err();
    assert!(matches!(err, crate::CspError::UnsortableLine { .. }));
    assert!(!err.is_retryable());
}

#[test]
fn sorting_orders_by_distance_from_origin() {
    let mut lines = LineMap::new();
    let l = cost(-0.5, 0.4);
    lines.insert(
        l,
        vec![Point::new(0.8, 0.0), Point::new(0.0, 0.4), Point::new(0.4, 0.2)],
    );
    let sorted = sort_line_nodes(lines).unwrap();
    assert_eq!(
        sorted[&l],
        vec![Point::new(0.0, 0.4), Point::new(0.4, 0.2), Point::new(0.8, 0.0)]
    );
}
