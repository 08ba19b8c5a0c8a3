use ogm_odometry::*;

fn main() {
    // Odometry as the robot reports it: start, then a quarter turn clockwise
    // followed by 250 mm of travel.
    let reported = [
        OdometryPose::new(0.0, 0.0, 0.0),
        OdometryPose::new(0.0, 0.0, -90.0),
        OdometryPose::new(0.0, -250.0, -90.0),
    ];

    println!("Reconciling {} odometry poses...", reported.len());

    let mut previous: Option<Pose> = None;
    for (i, remote) in reported.iter().enumerate() {
        match reconcile(*remote) {
            Ok(pose) => {
                println!("Step {:>2}: remote {} -> map {}", i + 1, remote, pose);
                if let Some(before) = previous {
                    println!("         moved {}", Displacement::between(&before, &pose));
                }
                previous = Some(pose);
            }
            Err(e) => {
                eprintln!("Error reconciling step {}: {:?}", i + 1, e);
                break;
            }
        }
    }

    println!("Final Pose: {:?}", previous);
}
