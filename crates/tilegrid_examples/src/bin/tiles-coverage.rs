//! Prints grid layouts for a handful of extents, tile shapes and separations.
use tilegrid::prelude::*;
use tilegrid_examples::init_tracing;

struct Case {
    name: &'static str,
    extent: &'static [usize],
    tile_shape: &'static [usize],
    separation: Option<&'static [usize]>,
}

const CASES: [Case; 5] = [
    Case {
        name: "contiguous",
        extent: &[10, 10],
        tile_shape: &[5, 5],
        separation: None,
    },
    Case {
        name: "centered remainder",
        extent: &[9],
        tile_shape: &[5],
        separation: None,
    },
    Case {
        name: "overlapping",
        extent: &[16],
        tile_shape: &[5],
        separation: Some(&[2]),
    },
    Case {
        name: "gapped",
        extent: &[20, 14],
        tile_shape: &[3, 3],
        separation: Some(&[6, 5]),
    },
    Case {
        name: "too small",
        extent: &[4, 40],
        tile_shape: &[5, 5],
        separation: None,
    },
];

fn main() -> anyhow::Result<()> {
    init_tracing();

    for case in &CASES {
        let grid = TileGrid::new(case.extent, case.tile_shape, case.separation)?;
        println!(
            "{}: extent {:?} tile {:?} separation {:?}",
            case.name,
            grid.extent(),
            grid.tile_shape(),
            grid.separation()
        );
        println!(
            "  tiles {:?} offset {:?} border {:?}",
            grid.num_tiles(),
            grid.offset(),
            grid.border()
        );
        for axis in 0..grid.ndim() {
            match grid.covered_span(axis) {
                Some(span) => println!(
                    "  axis {axis}: covers {:?}, margins {} / {}",
                    span,
                    span.start,
                    grid.extent()[axis] - span.end
                ),
                None => println!("  axis {axis}: no tiles"),
            }
        }
        for window in grid.windows() {
            println!(
                "    {:>8}  {:?} .. {:?}",
                window.label(),
                window.start,
                window.end
            );
        }
    }
    Ok(())
}
