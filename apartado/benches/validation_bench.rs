use apartado::form::reservation::ReservationForm;
use apartado::service::memory::InMemoryBackend;
use apartado::validation::parse_timestamp;
use apartado::{
    validate_field, DurationPolicy, Field, FieldContext, FormMode, LogNotifier, ReservationDraft,
    Role,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_field");
    let ctx = FieldContext::new();

    group.bench_function("title_ok", |b| {
        b.iter(|| validate_field(Field::Title, black_box("Math Class"), &ctx));
    });

    group.bench_function("title_blank", |b| {
        b.iter(|| validate_field(Field::Title, black_box("   "), &ctx));
    });

    group.bench_function("email_ok", |b| {
        b.iter(|| validate_field(Field::Email, black_box("ana.lopez@school.edu"), &ctx));
    });

    group.bench_function("email_invalid", |b| {
        b.iter(|| validate_field(Field::Email, black_box("ana.lopez@school"), &ctx));
    });

    let edit = FieldContext::new().with_mode(FormMode::Edit);
    group.bench_function("password_edit_blank", |b| {
        b.iter(|| validate_field(Field::Password, black_box(""), &edit));
    });

    let start = parse_timestamp("2025-01-01T10:00");
    let ordered = FieldContext::new().with_start_at(start);
    group.bench_function("end_after_start", |b| {
        b.iter(|| validate_field(Field::EndAt, black_box("2025-01-01T11:00"), &ordered));
    });

    group.finish();
}

fn bench_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("duration_policy");
    let policy = DurationPolicy::default();
    let start = parse_timestamp("2025-01-01T10:00");

    for (name, end) in [
        ("too_short", "2025-01-01T10:20"),
        ("ok", "2025-01-01T11:00"),
        ("too_long", "2025-01-01T15:00"),
        ("reversed", "2025-01-01T09:30"),
    ] {
        let end = parse_timestamp(end);
        group.bench_with_input(BenchmarkId::from_parameter(name), &end, |b, end| {
            b.iter(|| policy.validate(black_box(start), black_box(*end)));
        });
    }

    group.bench_function("parse_timestamp", |b| {
        b.iter(|| parse_timestamp(black_box("2025-01-01T10:00:00.000")));
    });

    group.finish();
}

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("reservation_form");
    let notifier = LogNotifier;

    group.bench_function("validate_only", |b| {
        let backend = InMemoryBackend::new();
        let form = ReservationForm::new(&backend, &notifier);
        let draft = ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T11:00");
        b.iter(|| form.validate(black_box(&draft)));
    });

    group.bench_function("submit_sequential_slots", |b| {
        let backend = InMemoryBackend::new();
        let teacher = backend.register("ana.lopez@school.edu", "secret1", Role::Teacher);
        backend.add_space("Lab A", "Building 1");
        backend.sign_in_as(teacher.id);
        let mut day = 0u32;
        b.iter(|| {
            day += 1;
            let date = chrono::NaiveDate::from_num_days_from_ce_opt(738_000 + i32::try_from(day % 100_000).unwrap_or(0))
                .unwrap_or_default();
            let draft = ReservationDraft::new(
                "Math Class",
                format!("{date}T10:00"),
                format!("{date}T11:00"),
            );
            let mut form = ReservationForm::new(&backend, &notifier);
            black_box(form.submit(&draft))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_fields, bench_policy, bench_submit);
criterion_main!(benches);
