use super::{member_text, red_triangle};
use crate::color::{Color, ColorSpace, ColorSpaceKind};
use crate::common::{Error, Id, ResourceKind};
use crate::geometry::{Boundary, Path, Point, Transform};
use crate::object::{CompositeObject, Object, PathObject, TextCode, TextObject};
use crate::package::{Container, OpenOptions, Package, SaveOptions};
use crate::page::{LayerKind, PageArea};
use crate::resource::Font;
use chrono::NaiveDate;
use tempfile::tempdir;

#[test]
fn test_triangle_survives_save_and_open() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("triangle.ofd");

    let mut pkg = Package::new();
    pkg.add_new_document()
        .add_new_page()
        .add_new_layer(LayerKind::Body)
        .add_object(red_triangle());
    pkg.save(&path).expect("save package");

    let mut reopened = Package::open(&path).expect("open package");
    assert_eq!(reopened.document_count(), 1);
    let page = reopened.document_mut(0).unwrap().open_page(0).expect("open page");
    let objects = page.body_layer().expect("body layer").objects();
    assert_eq!(objects.len(), 1);

    let triangle = objects[0].as_path().expect("path object");
    let subpaths = triangle.path.subpaths();
    assert_eq!(subpaths.len(), 1);
    assert_eq!(subpaths[0].len(), 3);
    assert!(!subpaths[0].is_closed());
    assert!(triangle.fill);
    let fill = triangle.fill_color.as_ref().expect("fill colour");
    assert!(fill.is_same_color(&Color::rgb(255, 0, 0), 0.0));
    assert_eq!(objects[0].boundary, Boundary::new(10.0, 10.0, 60.0, 50.0));
}

#[test]
fn test_save_refuses_existing_file() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("exists.ofd");
    std::fs::write(&path, b"keep me").unwrap();

    let mut pkg = Package::new();
    pkg.add_new_document().add_new_page();
    let err = pkg.save(&path).unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(ref p) if p == &path));
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn test_member_layout() {
    let mut pkg = Package::new();
    let doc = pkg.add_new_document();
    doc.add_new_page();
    doc.add_new_page();
    let bytes = pkg.to_bytes().unwrap();

    let container = Container::from_bytes(bytes).unwrap();
    let files: Vec<String> = container
        .member_names()
        .into_iter()
        .filter(|n| !n.ends_with('/'))
        .collect();
    assert_eq!(
        files,
        vec![
            "OFD.xml",
            "Doc_0/Document.xml",
            "Doc_0/PublicRes.xml",
            "Doc_0/DocumentRes.xml",
            "Doc_0/Pages/Page_0/Content.xml",
            "Doc_0/Pages/Page_1/Content.xml",
        ]
    );
    let names = container.member_names();
    assert!(names.iter().any(|n| n == "Doc_0/Signs/"));
    assert!(names.iter().any(|n| n == "Doc_0/Pages/Page_1/"));

    let descriptor = String::from_utf8(container.read("OFD.xml").unwrap()).unwrap();
    assert!(descriptor.contains("<ofd:DocRoot>Doc_0/Document.xml</ofd:DocRoot>"));
}

#[test]
fn test_signs_directory_optional() {
    let mut pkg = Package::new();
    pkg.add_new_document().add_new_page();
    let bytes = pkg
        .to_bytes_with_options(&SaveOptions::new().with_signs_directory(false))
        .unwrap();
    let container = Container::from_bytes(bytes).unwrap();
    assert!(!container.member_names().iter().any(|n| n.starts_with("Doc_0/Signs")));
}

#[test]
fn test_graph_round_trip() {
    let mut pkg = Package::new();
    let doc = pkg.add_new_document();
    doc.info_mut().title = Some("Quarterly report".into());
    doc.info_mut().author = Some("Finance".into());
    doc.info_mut().creation_date = NaiveDate::from_ymd_opt(2024, 3, 1);
    doc.info_mut().keywords = vec!["report".into(), "q1".into()];
    let font = doc.common_data_mut().document_res_mut().add_font(Font::new("SimSun"));

    let page = doc.add_new_page();
    page.set_area(PageArea::new(Boundary::from_origin_size(0.0, 0.0, 148.0, 210.0)));
    let body = page.add_new_layer(LayerKind::Body);
    body.add_object(
        TextObject::new(font, 10.0).with_text_code(TextCode::new(0.0, 10.0, "Total")),
    );
    let mut curve = Path::new();
    curve
        .move_to(Point::new(0.0, 0.0))
        .curve_to(Point::new(5.0, 10.0), Point::new(15.0, 10.0), Point::new(20.0, 0.0))
        .close_path();
    body.add_object(
        Object::from(PathObject::new(curve).with_stroke(Color::gray(40)))
            .with_line_width(0.5)
            .with_alpha(128),
    );
    let group = CompositeObject::new(vec![red_triangle().into()]);
    body.add_object(Object::from(group).with_ctm(Transform::translate(5.0, 5.0)));
    page.add_new_layer(LayerKind::Foreground).add_object(red_triangle());

    doc.add_new_page();

    let bytes = pkg.to_bytes().unwrap();
    let mut reopened = Package::from_bytes(bytes).unwrap();
    reopened.document_mut(0).unwrap().open_all_pages().unwrap();

    assert_eq!(reopened.documents(), pkg.documents());
    assert_eq!(reopened.version(), "1.0");
    assert_eq!(reopened.doc_type(), "OFD");
    assert_eq!(
        reopened.document(0).unwrap().common_data().max_unit_id(),
        pkg.document(0).unwrap().common_data().max_unit_id()
    );
}

#[test]
fn test_fractional_boxes_survive_round_trip() {
    let mut pkg = Package::new();
    let page = pkg.add_new_document().add_new_page();
    page.set_area(PageArea::new(Boundary::from_origin_size(0.1, 0.2, 210.7, 297.3)));
    page.add_new_layer(LayerKind::Body)
        .add_object(Object::from(red_triangle()).with_boundary(Boundary::new(0.1, 0.0, 0.3, 1.0)));

    let bytes = pkg.to_bytes().unwrap();
    let mut reopened = Package::from_bytes(bytes).unwrap();
    let page = reopened.document_mut(0).unwrap().open_page(0).unwrap();
    assert_eq!(page.objects()[0].boundary, Boundary::new(0.1, 0.0, 0.3, 1.0));
    assert_eq!(page.objects()[0].boundary.xmax(), 0.3);
    assert_eq!(reopened.documents(), pkg.documents());
}

#[test]
fn test_pages_open_lazily() {
    let mut pkg = Package::new();
    let doc = pkg.add_new_document();
    for _ in 0..3 {
        doc.add_new_page().add_new_layer(LayerKind::Body).add_object(red_triangle());
    }
    let bytes = pkg.to_bytes().unwrap();

    let mut lazy = Package::from_bytes(bytes.clone()).unwrap();
    let doc = lazy.document_mut(0).unwrap();
    assert_eq!(doc.page_count(), 3);
    assert!(doc.pages().iter().all(|p| !p.is_open()));
    assert!(doc.page(1).unwrap().layers().is_empty());

    assert_eq!(doc.open_page(1).unwrap().objects().len(), 1);
    assert!(doc.page(1).unwrap().is_open());
    assert!(!doc.page(0).unwrap().is_open());
    assert!(!doc.page(2).unwrap().is_open());

    let eager = Package::from_bytes_with_options(bytes, &OpenOptions::new().with_eager_pages(true)).unwrap();
    assert!(eager.document(0).unwrap().pages().iter().all(|p| p.is_open()));
}

#[test]
fn test_reopened_package_saves_again() {
    let mut pkg = Package::new();
    pkg.add_new_document()
        .add_new_page()
        .add_new_layer(LayerKind::Body)
        .add_object(red_triangle());
    let first = pkg.to_bytes().unwrap();

    let mut reopened = Package::from_bytes(first).unwrap();
    let second = reopened.to_bytes().unwrap();
    let mut again = Package::from_bytes(second).unwrap();
    again.document_mut(0).unwrap().open_all_pages().unwrap();
    assert_eq!(again.documents(), pkg.documents());
}

#[test]
fn test_default_attributes_not_written() {
    let mut pkg = Package::new();
    let layer = pkg.add_new_document().add_new_page().add_new_layer(LayerKind::Body);
    layer.add_object(red_triangle());
    layer.add_object(Object::from(red_triangle()).with_line_width(0.25).with_alpha(100));
    let bytes = pkg.to_bytes().unwrap();

    let content = member_text(&bytes, "Doc_0/Pages/Page_0/Content.xml");
    assert_eq!(content.matches("LineWidth=").count(), 1);
    assert!(content.contains(r#"LineWidth="0.25""#));
    assert_eq!(content.matches("Alpha=").count(), 1);
    assert!(content.contains(r#"Alpha="100""#));
    assert!(!content.contains("PageRes"));
}

#[test]
fn test_multiple_documents() {
    let mut pkg = Package::new();
    pkg.add_new_document().add_new_page();
    let second = pkg.add_new_document();
    assert_eq!(second.doc_root(), "Doc_1");
    second.add_new_page();
    second.add_new_page();

    let bytes = pkg.to_bytes().unwrap();
    assert!(member_text(&bytes, "OFD.xml").contains("Doc_1/Document.xml"));

    let reopened = Package::from_bytes(bytes).unwrap();
    assert_eq!(reopened.document_count(), 2);
    assert_eq!(reopened.document(1).unwrap().page_count(), 2);
    assert_eq!(reopened.document(1).unwrap().doc_root(), "Doc_1");
    // Each document numbers its own ids.
    assert_eq!(reopened.document(0).unwrap().pages()[0].id(), Id::new(1));
    assert_eq!(reopened.document(1).unwrap().pages()[0].id(), Id::new(1));
}

#[test]
fn test_default_color_space() {
    let mut pkg = Package::new();
    let doc = pkg.add_new_document();
    let gray = doc
        .common_data_mut()
        .document_res_mut()
        .add_color_space(ColorSpace::new(ColorSpaceKind::Gray));
    doc.common_data_mut().default_cs = gray;
    let mut path = Path::new();
    path.rectangle(0.0, 0.0, 10.0, 10.0);
    doc.add_new_page()
        .add_new_layer(LayerKind::Body)
        .add_object(PathObject::new(path).with_fill(Color::gray(128)));

    let bytes = pkg.to_bytes().unwrap();
    assert!(member_text(&bytes, "Doc_0/Document.xml").contains(&format!("<ofd:DefaultCS>{gray}</ofd:DefaultCS>")));

    let mut reopened = Package::from_bytes(bytes).unwrap();
    let doc = reopened.document_mut(0).unwrap();
    assert_eq!(doc.common_data().default_cs, gray);
    let page = doc.open_page(0).unwrap();
    let fill = page.objects()[0].as_path().unwrap().fill_color.clone().unwrap();
    assert_eq!(fill.kind(), ColorSpaceKind::Gray);
    assert!(fill.is_same_color(&Color::gray(128), 0.0));
}

#[test]
fn test_check_references_after_open() {
    let mut pkg = Package::new();
    let doc = pkg.add_new_document();
    let font = doc.common_data_mut().public_res_mut().add_font(Font::new("KaiTi"));
    let layer = doc.add_new_page().add_new_layer(LayerKind::Body);
    layer.add_object(TextObject::new(font, 4.0).with_text_code(TextCode::new(0.0, 4.0, "ok")));
    layer.add_object(TextObject::new(Id::new(42), 4.0).with_text_code(TextCode::new(0.0, 8.0, "lost")));
    let bytes = pkg.to_bytes().unwrap();

    let mut reopened = Package::from_bytes(bytes).unwrap();
    let doc = reopened.document_mut(0).unwrap();
    assert!(doc.check_references().is_empty(), "unopened pages are not checked");
    doc.open_all_pages().unwrap();
    let errors = doc.check_references();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        Error::DanglingReference { page: 0, kind: ResourceKind::Font, id, .. } if id == Id::new(42)
    ));
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().expect("create temp dir");
    let err = Package::open(dir.path().join("absent.ofd")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
