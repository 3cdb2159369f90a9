use crate::infra::{load_catalog, CATALOG_DEADLINE};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Args;
use showroom::catalog::{resolve_within, CarDetail};
use showroom::config::AppConfig;
use showroom::configurator::{build_quote, Quote, Selection};
use showroom::error::AppError;
use showroom::format::{format_compact_currency, format_currency};
use showroom::leads::{LeadForm, LeadFormError, LeadIntent, SimulatedLeadSubmitter, SubmissionStatus};
use showroom::pricing::FeeScheduleImporter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Model id or slug, e.g. `vf8` or `vf-8`
    #[arg(long)]
    pub(crate) model: String,
    /// Trim code (defaults to the first trim)
    #[arg(long)]
    pub(crate) trim: Option<String>,
    /// Exterior color code (defaults to the first color)
    #[arg(long)]
    pub(crate) exterior: Option<String>,
    /// Interior color code (defaults to the first color)
    #[arg(long)]
    pub(crate) interior: Option<String>,
    /// CSV fee schedule replacing the model's own on-road fees
    #[arg(long)]
    pub(crate) fees_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct LeadArgs {
    /// Model the lead is about
    #[arg(long, default_value = "vf8")]
    pub(crate) model: String,
    /// test-drive or pre-order
    #[arg(long, default_value = "test-drive")]
    pub(crate) intent: LeadIntent,
    #[arg(long)]
    pub(crate) full_name: String,
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) city: String,
    #[arg(long)]
    pub(crate) dealer: Option<String>,
    /// Preferred visit date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) preferred_date: Option<NaiveDate>,
    /// Preferred visit time (HH:MM)
    #[arg(long, value_parser = crate::infra::parse_time)]
    pub(crate) preferred_time: Option<NaiveTime>,
    /// Trim of interest (defaults to the first trim)
    #[arg(long)]
    pub(crate) trim: Option<String>,
    /// Exterior color of interest (defaults to the first color)
    #[arg(long)]
    pub(crate) exterior: Option<String>,
    /// Interior color of interest (defaults to the first color)
    #[arg(long)]
    pub(crate) interior: Option<String>,
    /// Free-text note for the consultant
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

pub(crate) async fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        model,
        trim,
        exterior,
        interior,
        fees_csv,
    } = args;

    let config = AppConfig::load()?;
    let detail = load_detail(&config, &model).await?;

    let schedule = fees_csv
        .map(FeeScheduleImporter::from_path)
        .transpose()?;
    let selection = Selection::new(trim.as_deref(), exterior.as_deref(), interior.as_deref());
    let quote = build_quote(&detail, &selection, schedule.as_ref())?;

    render_quote(&detail, &quote, schedule.is_some());
    Ok(())
}

pub(crate) async fn run_lead(args: LeadArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let detail = load_detail(&config, &args.model).await?;

    let intent = args.intent;
    let mut form = lead_form(&detail, args, config.leads.notice_ttl);

    println!(
        "{} for {} {}",
        intent.call_to_action(&detail.model_name),
        detail.brand,
        detail.model_name
    );

    let submitter = SimulatedLeadSubmitter::new(config.leads.latency);
    match form.submit(&submitter, config.leads.timeout).await {
        Ok(status) => {
            if let SubmissionStatus::Succeeded { lead_id } = &status {
                println!("  Lead id: {}", lead_id.0);
            }
            if let Some(notice) = form.active_notice(Utc::now()) {
                println!("  {}", notice.message);
            }
            Ok(())
        }
        Err(LeadFormError::Invalid(errors)) => {
            println!("  Please correct the following fields:");
            for (field, error) in errors.iter() {
                println!("    {:<10} {}", field.key(), error.message());
            }
            Err(LeadFormError::Invalid(errors).into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Prefill a form for `detail` from the command line. Codes the model does
/// not offer fall back to its first option.
pub(crate) fn lead_form(detail: &CarDetail, args: LeadArgs, notice_ttl: Duration) -> LeadForm {
    let selection = Selection::new(
        args.trim.as_deref(),
        args.exterior.as_deref(),
        args.interior.as_deref(),
    )
    .reconcile(detail);

    let mut form = LeadForm::new(detail).with_notice_ttl(notice_ttl);
    form.set_intent(args.intent);
    form.sync_selection(
        selection.trim_code.as_deref(),
        selection.exterior_code.as_deref(),
        selection.interior_code.as_deref(),
    );

    let input = form.input_mut();
    input.full_name = args.full_name;
    input.phone = args.phone;
    input.email = args.email;
    input.city = args.city;
    input.preferred_dealer = args.dealer.unwrap_or_default();
    input.preferred_date = args
        .preferred_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    input.preferred_time = args
        .preferred_time
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default();
    input.notes = args.notes.unwrap_or_default();
    form
}

async fn load_detail(config: &AppConfig, model: &str) -> Result<CarDetail, AppError> {
    let catalog = load_catalog(&config.catalog)?;
    let detail = resolve_within(&catalog, model, CATALOG_DEADLINE).await?;
    Ok(detail)
}

pub(crate) fn render_quote(detail: &CarDetail, quote: &Quote, imported_fees: bool) {
    println!("{} {} quote", detail.brand, detail.model_name);

    let Some(price) = &quote.price else {
        println!("  No trims are offered for this model.");
        return;
    };
    let currency = price.currency;

    println!(
        "  Trim: {} ({})",
        price.trim_name,
        format_currency(Some(price.base_price), currency)
    );
    for note in &price.notes {
        println!(
            "    + {:<28} {}",
            note.label,
            format_currency(Some(note.amount), currency)
        );
    }
    println!("  Colors: {}", price.color_adjustment_label());
    println!(
        "  Vehicle price: {} ({})",
        format_currency(Some(price.total), currency),
        format_compact_currency(Some(price.total), currency)
    );

    match &quote.on_road {
        Some(estimate) => {
            if imported_fees {
                println!("\nOn-road costs (imported fee schedule)");
            } else {
                println!("\nOn-road costs");
            }
            for fee in &estimate.fees {
                println!(
                    "  {:<30} {:>20}",
                    fee.label,
                    format_currency(Some(fee.amount), currency)
                );
            }
            println!(
                "  {:<30} {:>20}",
                "Fees total",
                format_currency(Some(estimate.fees_total), currency)
            );
            println!(
                "  {:<30} {:>20}",
                "Estimated on-road price",
                format_currency(Some(estimate.total), currency)
            );
        }
        None => println!("\nOn-road costs: not available for this model"),
    }
}
