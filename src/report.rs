//! The built-in face-morphing report.
//!
//! Four parent sections with eight sections in total. Image URLs are
//! resolved against the given [`AssetRoot`] while the document is built.

use crate::model::{
    AssetRoot, ContentNode, Document, ImageRef, ListItem, Metadata, ParentSection, Section,
    SublistEntry,
};

/// Build the face-morphing report.
pub fn face_morphing(root: &AssetRoot) -> Document {
    let metadata = Metadata {
        title: "Face Morphing".to_string(),
        subtitle: None,
        author: None,
        description: Some(
            "Midway faces, morph sequences, population mean faces and PCA of facial geometry."
                .to_string(),
        ),
    };

    Document::new(
        metadata,
        vec![
            ParentSection::new(
                "face-morphing",
                "Face Morphing",
                vec![midway_face(root), morph_sequence(root)],
            ),
            ParentSection::new(
                "mean-face",
                "Mean Face",
                vec![mean_face_population(root), extrapolation(root)],
            ),
            ParentSection::new(
                "pca",
                "Principal Component Analysis",
                vec![pca_rationale(), pca_example(root)],
            ),
            ParentSection::new(
                "extra",
                "Extra",
                vec![automatic_morphing(root), modify_a_face(root)],
            ),
        ],
    )
}

fn grid(root: &AssetRoot, columns: u32, images: &[(&str, &str)]) -> ContentNode {
    let images = images
        .iter()
        .map(|(title, file)| ImageRef::new(*title, root.resolve(&format!("images/{}", file))))
        .collect();
    ContentNode::image_grid(columns, images).expect("report grids have at least one column")
}

fn item(text: &str, sublist: Vec<SublistEntry>) -> ListItem {
    ListItem::with_sublist(text, sublist)
}

fn midway_face(root: &AssetRoot) -> Section {
    Section::new(
        "midway-face",
        "Midway Face",
        vec![
            ContentNode::paragraph(
                r#"In this section, we are trying to compute the "average" of 2 faces. This is created via the following steps:"#,
            ),
            ContentNode::list(vec![
                item(
                    "Obtain the corresponding keypoints for the two faces.",
                    vec![
                        "Keypoints should outline the overall structure of a face as well as the structure of some key features such as the eyes, nose, and mouth.".into(),
                        "Ensure consistency between keypoints of both faces.".into(),
                    ],
                ),
                item(
                    "Compute the average of each pair of keypoints.",
                    vec!["This will give us a set of average keypoints that represent the midway geometry of the 2 faces.".into()],
                ),
                item(
                    "Perform a triangulation on the keypoints (e.g., Delaunay).",
                    vec!["This triangulation should be consistent for both images. For better results, the triangulation is first performed on the set of midway keypoints. Then, this same triangulation is applied to the keypoints of the 2 faces.".into()],
                ),
                item(
                    "Warp each image to the average geometry.",
                    vec![
                        "Warp each triangle of the original images to the corresponding triangle of the midway image.".into(),
                        "The warping of each triangle from the original image to the midway image can be represented by an affine transformation. In homogeneous coordinates, it can be represented as matrix vector multiplication:".into(),
                        ContentNode::math(
                            r"\( \mathbf{x}' = A \mathbf{x} \quad \text{where} \quad \mathbf{x}' = \begin{bmatrix} x' \\ y' \\ 1 \end{bmatrix}, \quad A = \begin{bmatrix} a & b & c \\ d & e & f \\ 0 & 0 & 1 \end{bmatrix}, \quad \mathbf{x} = \begin{bmatrix} x \\ y \\ 1 \end{bmatrix} \)",
                        )
                        .into(),
                        "To solve for the transformation matrix A, we write an expression using the vertices of the source and destination triangles:".into(),
                        ContentNode::math(
                            r"\( X A^T = X' \quad \text{where} \quad X = \begin{bmatrix} x_1 & y_1 & 1 \\ x_2 & y_2 & 1 \\ x_3 & y_3 & 1 \end{bmatrix}, \quad X' = \begin{bmatrix} x_1' & y_1' & 1 \\ x_2' & y_2' & 1 \\ x_3' & y_3' & 1 \end{bmatrix} \)",
                        )
                        .into(),
                        "After solving for A, we perform inverse warping. For each point in the destination triangle, we calculate its corresponding location (preimage) in the source triangle using the inverse of A which exists as long as the triangles are not degenerate. When the preimage does not have integer coordinates, we use bilinear interpolation to estimate the pixel value by interpolating between the 4 neighboring pixels in the source triangle. We copy this value to the corresponding pixel in the destination triangle.".into(),
                    ],
                ),
                item(
                    "Cross-dissolve the 2 warped images to obtain the final midway image.",
                    vec!["Average the 2 warped images pixel-wise.".into()],
                ),
            ]),
            grid(
                root,
                4,
                &[
                    ("Me", "me.jpeg"),
                    ("Triangulation", "me_tri.jpg"),
                    ("Ronaldo", "ronaldo3.jpeg"),
                    ("Triangulation", "ronaldo_tri.jpg"),
                ],
            ),
            grid(
                root,
                3,
                &[
                    ("Me warped to midway", "warped_me.jpg"),
                    ("Ronaldo warped to midway", "warped_ronaldo.jpg"),
                    ("Midway Face", "midway.jpg"),
                ],
            ),
        ],
    )
}

fn morph_sequence(root: &AssetRoot) -> Section {
    Section::new(
        "morph-sequence",
        "Morph Sequence",
        vec![
            ContentNode::paragraph(
                "The midway face is a special case of a convex combination of two faces, where the weight t is set to 1/2. The value of t is used to compute the midway keypoints for warping as well as for cross-dissolving. By varying t from 0 to 1, we can obtain a transition from one image to another. In the example below, a sigmoid t controls the warping, while a linear t is used for the cross-dissolving.",
            ),
            grid(root, 1, &[("Morph Sequence", "morph_sequence.gif")]),
        ],
    )
}

fn mean_face_population(root: &AssetRoot) -> Section {
    Section::new(
        "mean-face-population",
        "Mean Face",
        vec![
            ContentNode::paragraph(
                "We extend the idea of morphing 2 images to computing the mean face of a population. First, we find the average geometry by computing the average across the entire population for each keypoints. Then, we warp each face to the average geometry. Finally, we cross-dissolve the faces to obtain the mean face.",
            ),
            ContentNode::paragraph(
                "The IMM Face Database with 37 faces is used to compute the mean face below. Then, a few faces from the database are warped to the mean geometry.",
            ),
            grid(root, 1, &[("Mean Face", "mean_face.jpg")]),
            grid(
                root,
                4,
                &[
                    ("Example 1", "01-1m.jpg"),
                    ("Example 1 warped to mean", "warped01.jpg"),
                    ("Example 2", "05-1m.jpg"),
                    ("Example 2 warped to mean", "warped05.jpg"),
                    ("Example 3", "06-1m.jpg"),
                    ("Example 3 warped to mean", "warped06.jpg"),
                    ("Example 4", "07-1m.jpg"),
                    ("Example 4 warped to mean", "warped07.jpg"),
                ],
            ),
            grid(
                root,
                3,
                &[
                    ("Me", "me3.jpg"),
                    ("Me warped to mean Dane", "metomean.jpg"),
                    ("Mean Dane warped to me", "meantome.jpg"),
                ],
            ),
        ],
    )
}

fn extrapolation(root: &AssetRoot) -> Section {
    Section::new(
        "extrapolation",
        "Extrapolation",
        vec![
            ContentNode::paragraph(
                "Instead of interpolating between 2 images with weight t between 0 and 1, we can exaggerate facial features by extrapolating from the mean with t > 1.",
            ),
            grid(root, 2, &[("Me", "me3.jpg"), ("t = 1.5", "meextra.jpg")]),
        ],
    )
}

fn pca_rationale() -> Section {
    Section::new(
        "pca-rationale",
        "Rationale",
        vec![
            ContentNode::paragraph(
                "A face can be represented by a shape vector and an appearance vector. We will concern ourselves only with the geometry of a face and hence the shape vector. The shape vector consists of the flattened x and y coordinates of keypoints of a face.",
            ),
            ContentNode::paragraph(
                "Principal Component Analysis is a dimensionality reduction technique that aims to project data into a lower-dimensional space while preserving as much variance as possible. This is equivalent to minimizing the sum of squared distances between the original data points and their projections onto the subspace. Besides dimensionality reduction, PCA also removes noise and allow for better data interpretability.",
            ),
            ContentNode::list(vec![
                item(
                    "Data Matrix Setup.",
                    vec![
                        "We begin with a centered data matrix X of n data points (shape vectors), each of dimension d, stacked horizontally. X has rank r, where r <= d.".into(),
                        ContentNode::math(
                            r"\( X = \begin{bmatrix} \text{------} \mathbf{x}_1^T \text{------} \\ \text{------} \mathbf{x}_2^T \text{------} \\ \vdots \\ \text{------} \mathbf{x}_n^T \text{------} \end{bmatrix} \)",
                        )
                        .into(),
                        "Our goal is to project the data onto a subspace of rank l, where l < r, while preserving as much variance as possible.".into(),
                    ],
                ),
                item(
                    "Covariance Matrix.",
                    vec![
                        "To obtain the components of the desired subspace, we would have to obtain the right singular vectors on the covariance matrix:".into(),
                        ContentNode::math(r"\( C = \frac{1}{n} X^T X \)").into(),
                        "Instead of directly performing SVD on the covariance matrix which runs in O(d^3), we perform SVD directly on the centered data matrix X which runs on O(nd^2), since d > n in our example. This works because the right singular vectors are the same.".into(),
                    ],
                ),
                item(
                    "Singular Value Decomposition.",
                    vec![
                        "We decompose the centered data matrix using SVD:".into(),
                        ContentNode::math(r"\( X = U \Sigma V^T \)").into(),
                    ],
                ),
                item(
                    "Subspace of Rank l.",
                    vec![
                        "The subspace of rank l that minimizes the sum of squared distances from the data to the subspace is spanned by the first l columns of the matrix V.".into(),
                        "These components in the subspace also maximize the variance of the projected data.".into(),
                    ],
                ),
                item(
                    "Projection of Data.",
                    vec![
                        "We can project the data onto the subspace spanned by the first l components of V, representing the data in the PCA basis:".into(),
                        ContentNode::math(r"\( X_{\text{proj}} = X V_l \)").into(),
                    ],
                ),
                item(
                    "Reconstruction of Data.",
                    vec![
                        "To reconstruct the data from the reduced PCA subspace back to the original space, we use the following:".into(),
                        ContentNode::math(r"\( X_{\text{reconstructed}} = X V_l V_l^T \)").into(),
                    ],
                ),
            ]),
        ],
    )
}

fn component_grid(root: &AssetRoot, component: u32) -> ContentNode {
    let titles: Vec<(String, String)> = [-5, -3, 0, 3, 5]
        .iter()
        .map(|scale| {
            (
                format!("Component {} scaled by {}", component, scale),
                format!("comp{}_{}.jpg", component, scale),
            )
        })
        .collect();
    let images: Vec<(&str, &str)> = titles
        .iter()
        .map(|(title, file)| (title.as_str(), file.as_str()))
        .collect();
    grid(root, 5, &images)
}

fn pca_example(root: &AssetRoot) -> Section {
    let mut content = vec![
        ContentNode::paragraph(
            "After computing SVD on X, we plot the singular values. We will take the first 4 components since the singular values drop off significantly after.",
        ),
        grid(root, 1, &[("Singular Values", "singular_values.jpg")]),
        ContentNode::paragraph(
            "After projecting our data points into the first 4 components, we can understand what each component represents by exaggerating or scaling up that component individually. Then, we reconstruct the image by projecting the PCA vector back into the original space of dimension d. It appears that component 0 represents the position of the face relative to the frame, component 2 represents the size of facial features relative to the face and component 3 represents the tilt of the face. Unfortunately, it is difficult to see what component 1 represents.",
        ),
    ];
    content.extend((0..4).map(|component| component_grid(root, component)));
    content.push(ContentNode::paragraph(
        "The same steps of face morphing and extrapolation can also be performed on PCA basis. For extrapolation, we can simply scale the PCA vector and reconstruct the extrapolated image by projecting the extrpolated PCA vector back to d dimensions. This extrapolation will be smoother (highlighting only the key characteristics of a face) than extrapolation done in the normal basis.",
    ));
    content.push(grid(
        root,
        3,
        &[
            ("Original", "01-1m.jpg"),
            ("Extrapolated in normal basis (t = 2)", "im01extrapolated.jpg"),
            ("Extrapolated in PCA basis (t = 2)", "caricature_img_pca.jpg"),
        ],
    ));

    Section::new("example", "Example", content)
}

fn automatic_morphing(root: &AssetRoot) -> Section {
    Section::new(
        "morph-2-faces",
        "Automatic Morphing",
        vec![
            ContentNode::paragraph(
                "Instead of manually selecting keypoints of 2 images, this can be done automatically with libraries such as dlib shape_predictor_68_face_landmarks.",
            ),
            grid(
                root,
                4,
                &[
                    ("Me (auto)", "me_keypoints_triangles.jpg"),
                    ("Ronaldo (auto)", "ronaldo_keypoints_triangles.jpg"),
                    ("Midway (auto)", "midway_face_auto.jpg"),
                    ("Midway (manual)", "midway.jpg"),
                ],
            ),
        ],
    )
}

fn modify_a_face(root: &AssetRoot) -> Section {
    Section::new(
        "modify-a-face",
        "Modify a Face",
        vec![
            ContentNode::paragraph(
                "Modify facial proportions and expressions by dragging keypoints interactively. Here is an example:",
            ),
            grid(root, 1, &[("Interactive tool", "output.gif")]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderStats;

    #[test]
    fn test_report_structure() {
        let doc = face_morphing(&AssetRoot::default());
        assert_eq!(doc.parent_count(), 4);
        assert_eq!(doc.section_count(), 8);
        assert!(doc.validate().is_ok());

        let ids: Vec<_> = doc.sections().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "midway-face",
                "morph-sequence",
                "mean-face-population",
                "extrapolation",
                "pca-rationale",
                "example",
                "morph-2-faces",
                "modify-a-face"
            ]
        );
    }

    #[test]
    fn test_report_content_counts() {
        let stats = RenderStats::collect(&face_morphing(&AssetRoot::default()));
        assert_eq!(stats.list_count, 2);
        assert_eq!(stats.math_count, 7);
        assert_eq!(stats.image_grid_count, 15);
        assert_eq!(stats.image_count, 51);
        assert_eq!(stats.max_list_depth, 2);
    }

    #[test]
    fn test_report_resolves_assets() {
        let doc = face_morphing(&AssetRoot::new("/morph"));
        let section = doc.section("morph-sequence").unwrap();
        match &section.content[1] {
            ContentNode::ImageGrid { images, .. } => {
                assert_eq!(images[0].image_url, "/morph/images/morph_sequence.gif");
            }
            other => panic!("expected image grid, got {}", other.kind()),
        }
    }
}
