use barcode_labels::barcode::decode_row;
use barcode_labels::geometry::{LabelMakerSize, StandardSize};
use barcode_labels::{
    render_barcode, resolve, EncodingError, LabelComposer, LabelConfig, LabelConfigForm, LabelSize, Orientation,
    Product, RenderOptions, ResolvedGeometry,
};

fn products(json: &str) -> Vec<Product> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn scenario_a_standard_medium_horizontal() {
    let cfg = LabelConfig {
        size: LabelSize::Standard(StandardSize::Medium),
        orientation: Orientation::Horizontal,
    };
    assert_eq!(
        resolve(&cfg),
        ResolvedGeometry { width_in: 2.0, height_in: 1.25, rotation_degrees: 0 }
    );
}

#[test]
fn scenario_b_dymo30336_vertical() {
    let form: LabelConfigForm = serde_json::from_str(
        r#"{"labelType":"labelMaker","sizePreset":"dymo30336","orientation":"vertical"}"#,
    )
    .unwrap();
    let cfg = LabelConfig::try_from(form).unwrap();
    assert_eq!(cfg.size, LabelSize::LabelMaker(LabelMakerSize::Dymo30336));
    assert_eq!(
        resolve(&cfg),
        ResolvedGeometry { width_in: 1.0, height_in: 2.125, rotation_degrees: 90 }
    );
}

#[test]
fn scenario_c_id_fallback() {
    let p = products(r#"[{"id":"123","title":"No variants","variants":[]}]"#);
    assert_eq!(p[0].barcode_value(), "123");

    let opts = RenderOptions::default();
    let img = render_barcode(p[0].barcode_value(), Orientation::Horizontal, &opts).unwrap();
    assert_eq!(decode_row(&img.image, img.scan_row(), img.module_px).unwrap(), "123");
}

#[test]
fn scenario_d_bad_sku_is_isolated() {
    let selection = products(
        r#"[
        {"id":1,"title":"Tea","variants":[{"sku":"TEA-01","price":"3.00"}]},
        {"id":2,"title":"Café","variants":[{"sku":"CAFÉ-02","price":"4.00"}]},
        {"id":3,"title":"Jam","variants":[{"sku":"JAM-03","price":"5.00"}]}
    ]"#,
    );
    let cfg = LabelConfig {
        size: LabelSize::LabelMaker(LabelMakerSize::Dymo30252),
        orientation: Orientation::Horizontal,
    };

    let composer = LabelComposer::default();
    let batch = composer.build_batch(&selection, &cfg);

    let rendered: Vec<&str> = batch.labels.iter().map(|l| l.barcode.value.as_str()).collect();
    assert_eq!(rendered, ["TEA-01", "JAM-03"]);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].product_id.to_string(), "2");
    assert_eq!(batch.failures[0].value, "CAFÉ-02");
    assert_eq!(batch.failures[0].error, EncodingError::UnsupportedChar { ch: 'É', position: 3 });

    // one roll label per successful product, none for the failure
    let doc = composer.compose(&batch);
    assert_eq!(doc.pages.len(), 2);
}

#[test]
fn rendered_labels_carry_readable_barcodes() {
    let selection = products(r#"[{"id":9,"title":"Mug","variants":[{"sku":"MUG-42","price":"12.00"}]}]"#);
    let composer = LabelComposer::default();
    let batch = composer.build_batch(&selection, &LabelConfig::default());
    let label = &batch.labels[0];
    assert_eq!(
        decode_row(&label.barcode.image, label.barcode.scan_row(), label.barcode.module_px).unwrap(),
        "MUG-42"
    );
}
