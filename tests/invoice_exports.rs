use chrono::NaiveDate;
use invoice_generator::generators::build_invoice_layout;
use invoice_generator::{
    execute, AppConfig, Command, DocumentError, FontSet, InvoiceDraft, InvoiceModel, Outcome,
    PartyInfo, PdfConfig, Renderers,
};
use lopdf::Document;

fn renderers() -> Renderers {
    Renderers::new(AppConfig::default()).with_fonts(FontSet::builtin())
}

fn filled_model() -> InvoiceModel {
    let now = NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap();
    let mut model = InvoiceModel::starting_at("Net 30", now);
    let r = renderers();
    for command in [
        Command::SetCompany(PartyInfo::new("Acme Traders", "12 Mall Road\nLahore", "042-111", "sales@acme.pk")),
        Command::SetCustomer(PartyInfo::new("Zed Stores", "5 Canal View", "0300-222", "buy@zed.pk")),
        Command::AddItem {
            description: "Widget".into(),
            quantity: "2".into(),
            rate: "50".into(),
        },
        Command::AddItem {
            description: "Service".into(),
            quantity: "1".into(),
            rate: "100".into(),
        },
        Command::SetDiscountRate("10".into()),
    ] {
        execute(&mut model, command, &r).unwrap();
    }
    model
}

#[test]
fn totals_match_the_worked_examples() {
    let model = filled_model();
    let discounted = model.totals();
    assert!((discounted.subtotal - 200.0).abs() < 1e-9);
    assert!((discounted.discount_amount - 20.0).abs() < 1e-9);
    assert!((discounted.tax_amount - 0.0).abs() < 1e-9);
    assert!((discounted.total - 180.0).abs() < 1e-9);

    let taxed = model.compute_totals("10", "0");
    assert!((taxed.tax_amount - 20.0).abs() < 1e-9);
    assert!((taxed.total - 220.0).abs() < 1e-9);
}

#[test]
fn all_three_exports_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = filled_model();
    let r = renderers();

    let text_path = dir.path().join("invoice.txt");
    let pdf_path = dir.path().join("invoice.pdf");
    let jpg_path = dir.path().join("invoice.jpg");
    let png_path = dir.path().join("invoice.png");

    for command in [
        Command::SaveText(text_path.clone()),
        Command::ExportPdf(pdf_path.clone()),
        Command::ExportImage(jpg_path.clone()),
        Command::ExportImage(png_path.clone()),
    ] {
        assert!(matches!(execute(&mut model, command, &r).unwrap(), Outcome::Saved(_)));
    }

    let text = std::fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("INV-202610191405"));
    assert!(text.contains("₨     180.00"));

    let pdf = Document::load(&pdf_path).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);

    let jpg = image::open(&jpg_path).unwrap();
    assert_eq!((jpg.width(), jpg.height()), (800, 1100));
    let png_bytes = std::fs::read(&png_path).unwrap();
    assert_eq!(image::guess_format(&png_bytes).unwrap(), image::ImageFormat::Png);
}

#[test]
fn exports_do_not_change_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = filled_model();
    let before = model.data().clone();
    let r = renderers();

    execute(&mut model, Command::ExportPdf(dir.path().join("a.pdf")), &r).unwrap();
    execute(&mut model, Command::ExportImage(dir.path().join("a.png")), &r).unwrap();
    execute(&mut model, Command::Generate, &r).unwrap();

    assert_eq!(model.data(), &before);
}

#[test]
fn failed_export_leaves_session_usable() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = filled_model();
    let r = renderers();

    let bad = dir.path().join("missing").join("invoice.pdf");
    let err = execute(&mut model, Command::ExportPdf(bad), &r).unwrap_err();
    assert!(matches!(err, DocumentError::RenderError(_)));

    let bad_text = dir.path().join("missing").join("invoice.txt");
    let err = execute(&mut model, Command::SaveText(bad_text), &r).unwrap_err();
    assert!(matches!(err, DocumentError::IoError(_)));

    let good = dir.path().join("invoice.pdf");
    execute(&mut model, Command::ExportPdf(good.clone()), &r).unwrap();
    assert!(good.exists());
}

#[test]
fn pdf_layout_falls_back_when_logo_breaks() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    image::RgbImage::from_pixel(30, 10, image::Rgb([0, 0, 0])).save(&logo).unwrap();

    let mut model = filled_model();
    let r = renderers();
    execute(&mut model, Command::SetLogo(Some(logo.clone())), &r).unwrap();

    // the file goes bad after it was selected
    std::fs::write(&logo, b"corrupted").unwrap();
    let layout = build_invoice_layout(model.data(), &model.totals(), &PdfConfig::default());
    assert!(layout.images.is_empty());
    assert_eq!(layout.page_text(0).first().map(String::as_str), Some("INVOICE"));

    execute(&mut model, Command::ExportPdf(dir.path().join("a.pdf")), &r).unwrap();
}

#[test]
fn clearing_issues_increasing_numbers() {
    let mut model = InvoiceModel::new();
    let r = renderers();
    let mut numbers = vec![model.data().invoice.number.clone()];
    for _ in 0..3 {
        execute(&mut model, Command::Clear, &r).unwrap();
        numbers.push(model.data().invoice.number.clone());
    }
    assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(model.data().tax_rate, "0");
    assert_eq!(model.data().discount_rate, "0");
}

#[test]
fn draft_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");
    let model = filled_model();
    InvoiceDraft::from_model(&model).save(&path).unwrap();

    let mut restored = InvoiceModel::new();
    InvoiceDraft::load(&path)
        .unwrap()
        .apply(&mut restored, &renderers())
        .unwrap();
    assert_eq!(restored.data(), model.data());
    assert_eq!(restored.totals(), model.totals());
}
