use ogm_mapping::{OccupancyGrid, Scan};
use ogm_odometry::Pose;

fn main() {
    // Create a 20x20 grid of 10mm cells, drawn 5 pixels wide
    let mut grid = OccupancyGrid::new(5, 10.0, 20, 20).unwrap();

    // Put the robot on the centre of a cell so the beams line up with cell centres
    grid.update_bot_state(&Pose::new(-5.0, -5.0, 0.0));
    println!("Robot at ({:.1}, {:.1})", grid.bot_position().x, grid.bot_position().y);

    // One reading every 45 degrees; 800 means nothing was seen
    let values = vec![60, 800, 45, 800, 70, 800, 45, 800];
    let scan = Scan::new(45, values, grid.bot_position(), grid.bot_heading()).unwrap();

    for (heading, value) in scan.rays() {
        let point = grid.measurement_point(value as f64, heading);
        let cell = grid.cell_for_point(point);
        println!(
            "Ray at {:5.1} deg reads {:3} mm -> point ({:6.1}, {:6.1}) in cell ({}, {})",
            heading, value, point.x, point.y, cell.x, cell.y
        );
    }

    let stats = grid.full_grid_update(scan).unwrap();
    println!(
        "\nEvaluated {} cell/ray pairs, applied {} updates ({} sentinel rays)",
        stats.evaluations, stats.updates, stats.sentinel_rays
    );

    // Print the map with a legend
    println!("\nOccupancy grid (0=occupied, 128=unknown, 255=free):");
    print!("{}", grid);
}
