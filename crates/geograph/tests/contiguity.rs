// Integration tests for contiguity graph construction:
//   holes, multi-part units, order independence, and grid invariants.

use geo::{polygon, MultiPolygon, Polygon};
use geograph::{Contiguity, ContiguityBuilder, UnitId};
use proptest::prelude::*;

fn cell(x: f64, y: f64) -> Polygon<f64> {
    polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0)]
}

fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![cell(x, y)])
}

fn grid(width: usize, height: usize) -> Vec<MultiPolygon<f64>> {
    (0..height)
        .flat_map(|row| (0..width).map(move |col| square(col as f64, row as f64)))
        .collect()
}

#[test]
fn unit_filling_a_hole_is_adjacent_to_its_surround() {
    let donut = MultiPolygon(vec![polygon![
        exterior: [(x: 0.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 3.0), (x: 0.0, y: 3.0)],
        interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 2.0)]],
    ]]);
    let geoms = vec![donut, square(1.0, 1.0), square(5.0, 5.0)];

    for rule in [Contiguity::Queen, Contiguity::Rook] {
        let adj = ContiguityBuilder::new(rule).build(&geoms).unwrap();
        assert!(adj.contains(UnitId(0), UnitId(1)), "{rule:?}");
        assert_eq!(adj.islands(), vec![UnitId(2)]);
    }
}

#[test]
fn every_part_of_a_multipolygon_counts() {
    let split = MultiPolygon(vec![cell(0.0, 0.0), cell(5.0, 0.0)]);
    let geoms = vec![split, square(1.0, 0.0), square(6.0, 0.0)];

    let adj = ContiguityBuilder::new(Contiguity::Rook).build(&geoms).unwrap();
    assert_eq!(adj.neighbors(UnitId(0)), &[UnitId(1), UnitId(2)]);
    assert!(!adj.contains(UnitId(1), UnitId(2)));
}

#[test]
fn edge_set_does_not_depend_on_input_order() {
    let geoms = grid(3, 3);
    let order = [4, 0, 8, 2, 6, 1, 7, 3, 5];
    let shuffled = order.iter().map(|&i| geoms[i].clone()).collect::<Vec<_>>();

    let base = ContiguityBuilder::default().build(&geoms).unwrap();
    let perm = ContiguityBuilder::default().build(&shuffled).unwrap();

    let mut mapped = perm.edges()
        .map(|(a, b)| {
            let (a, b) = (order[a.index()], order[b.index()]);
            (a.min(b), a.max(b))
        })
        .collect::<Vec<_>>();
    mapped.sort_unstable();

    let expected = base.edges().map(|(a, b)| (a.index(), b.index())).collect::<Vec<_>>();
    assert_eq!(mapped, expected);
}

#[test]
fn grid_components_and_subsets() {
    let mut geoms = grid(2, 2);
    geoms.push(square(10.0, 10.0));
    let adj = ContiguityBuilder::default().build(&geoms).unwrap();

    assert_eq!(adj.num_components(), 2);
    assert!(adj.is_connected_subset([UnitId(0), UnitId(3)]));
    assert!(!adj.is_connected_subset([UnitId(0), UnitId(4)]));
}

proptest! {
    #[test]
    fn grid_graphs_are_symmetric_with_known_edge_counts(width in 1usize..6, height in 1usize..6, queen in any::<bool>()) {
        let rule = if queen { Contiguity::Queen } else { Contiguity::Rook };
        let adj = ContiguityBuilder::new(rule).build(&grid(width, height)).unwrap();

        prop_assert!(adj.is_symmetric());
        for unit in adj.units() {
            prop_assert!(!adj.contains(unit, unit));
        }

        let rook = width * (height - 1) + height * (width - 1);
        let diagonals = 2 * (width - 1) * (height - 1);
        let expected = if queen { rook + diagonals } else { rook };
        prop_assert_eq!(adj.num_edges(), expected);
        prop_assert_eq!(adj.num_components(), 1);
    }
}
