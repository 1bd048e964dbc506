/// Fibonacci-sphere node placement and proximity links
use nalgebra::{Point2, Point3};

/// A point on the sphere plus its per-frame visual state
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Position on the sphere, fixed at creation
    pub position: Point3<f32>,
    /// Screen position from the latest frame, `None` when the projection was undefined
    pub screen: Option<Point2<f32>>,
    /// Projected depth from the latest frame
    pub depth: f32,
    /// Excitation in `[0, 1]`
    pub activation: f32,
    /// Indices of linked nodes, symmetric and never containing the node itself
    pub neighbors: Vec<usize>,
}

impl Node {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            screen: None,
            depth: 0.0,
            activation: 0.0,
            neighbors: Vec::new(),
        }
    }
}

/// Evenly spread `count` points over a sphere of `radius`
///
/// Each point gets an equal-area inclination and an azimuth stepped by the
/// golden angle. A non-positive radius collapses every point to the origin.
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<Point3<f32>> {
    let radius = radius.max(0.0);
    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let angle_increment = std::f32::consts::TAU * golden_ratio;

    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let inclination = (1.0 - 2.0 * t).clamp(-1.0, 1.0).acos();
            let azimuth = angle_increment * i as f32;

            Point3::new(
                radius * inclination.sin() * azimuth.cos(),
                radius * inclination.sin() * azimuth.sin(),
                radius * inclination.cos(),
            )
        })
        .collect()
}

/// Adjacency lists linking every pair of points closer than `max_distance`
pub fn connect(points: &[Point3<f32>], max_distance: f32) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); points.len()];

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if nalgebra::distance(&points[i], &points[j]) < max_distance {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }

    neighbors
}

/// Build a fresh node set for a sphere of `radius`
pub fn generate(count: usize, radius: f32, link_distance_factor: f32) -> Vec<Node> {
    let points = fibonacci_sphere(count, radius);
    let links = connect(&points, radius.max(0.0) * link_distance_factor);

    points
        .into_iter()
        .zip(links)
        .map(|(position, neighbors)| Node {
            neighbors,
            ..Node::new(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric_and_loop_free(nodes: &[Node]) {
        for (i, node) in nodes.iter().enumerate() {
            assert!(!node.neighbors.contains(&i), "node {i} links to itself");
            for &j in &node.neighbors {
                let back = nodes[j].neighbors.iter().filter(|&&k| k == i).count();
                assert_eq!(back, 1, "link {i} -> {j} is not mirrored exactly once");
            }
        }
    }

    #[test]
    fn test_points_lie_on_sphere() {
        let points = fibonacci_sphere(180, 250.0);
        assert_eq!(points.len(), 180);
        for p in &points {
            assert!((p.coords.norm() - 250.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_adjacency_symmetric() {
        let nodes = generate(180, 420.0, 0.45);
        assert_eq!(nodes.len(), 180);
        assert!(nodes.iter().any(|n| !n.neighbors.is_empty()));
        assert_symmetric_and_loop_free(&nodes);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(120, 300.0, 0.45);
        let b = generate(120, 300.0, 0.45);
        assert_eq!(a.len(), b.len());

        for i in 0..a.len() {
            assert_eq!(a[i].neighbors, b[i].neighbors);
            for j in 0..a.len() {
                let da = nalgebra::distance(&a[i].position, &a[j].position);
                let db = nalgebra::distance(&b[i].position, &b[j].position);
                assert_eq!(da, db);
            }
        }
    }

    #[test]
    fn test_single_node() {
        let nodes = generate(1, 100.0, 0.45);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].neighbors.is_empty());
        assert!((nodes[0].position.z - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_and_degenerate() {
        assert!(generate(0, 100.0, 0.45).is_empty());

        let collapsed = generate(12, 0.0, 0.45);
        assert_eq!(collapsed.len(), 12);
        for node in &collapsed {
            assert_eq!(node.position, Point3::origin());
            assert!(node.neighbors.is_empty());
        }

        let negative = generate(5, -10.0, 0.45);
        assert!(negative.iter().all(|n| n.position.coords.norm() == 0.0));
    }

    #[test]
    fn test_two_close_nodes_link_once() {
        let points = [Point3::new(0.0, 0.0, 10.0), Point3::new(0.0, 3.0, 10.0)];
        let links = connect(&points, 4.5);
        assert_eq!(links, vec![vec![1], vec![0]]);

        let apart = connect(&points, 3.0);
        assert_eq!(apart, vec![Vec::<usize>::new(), Vec::new()]);
    }
}
