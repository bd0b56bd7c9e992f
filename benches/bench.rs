// Criterion benchmarks for Alumni Connect

use alumni_connect::core::{merge_results, prompts::message_prompt, schools_for};
use alumni_connect::models::{parse_lines, Education, Experience, Profile, UserProfile, UserResult};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_result(id: usize) -> UserResult {
    UserResult {
        profile: Profile {
            id: format!("p{}", id),
            name: format!("Alum {}", id),
            headline: "Software Engineer at Google".to_string(),
            title: "Software Engineer".to_string(),
            linkedin_url: format!("https://www.linkedin.com/in/alum-{}", id),
            ..Default::default()
        },
        experience: (0..3)
            .map(|i| Experience {
                title: format!("Role {}", i),
                company_name: "Google".to_string(),
                ..Default::default()
            })
            .collect(),
        education: vec![Education {
            degree: "BS".to_string(),
            field_of_study: "Computer Science".to_string(),
            school_name: "University of Southern California".to_string(),
            ..Default::default()
        }],
    }
}

fn create_student() -> UserProfile {
    UserProfile {
        university_name: "University of Southern California".to_string(),
        full_name: "John Doe".to_string(),
        grade_year: "Junior".to_string(),
        clubs: vec!["Lavalab".to_string(), "Startup Incubator".to_string()],
        societies: vec!["BAP".to_string()],
        location: "Los Angeles".to_string(),
    }
}

fn bench_merge_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_results");

    for count in [10, 50, 100, 500].iter() {
        let primary: Vec<UserResult> = (0..*count).map(create_result).collect();
        // Half of the backup overlaps the primary results
        let backup: Vec<UserResult> = (count / 2..count + count / 2).map(create_result).collect();

        group.bench_with_input(BenchmarkId::new("half_overlap", count), count, |b, _| {
            b.iter(|| merge_results(black_box(primary.clone()), black_box(backup.clone())));
        });
    }

    group.finish();
}

fn bench_parse_lines(c: &mut Criterion) {
    let text = (0..50)
        .map(|i| format!("  Club number {}  \n\n", i))
        .collect::<String>();

    c.bench_function("parse_lines_50_entries", |b| {
        b.iter(|| parse_lines(black_box(&text)));
    });
}

fn bench_message_prompt(c: &mut Criterion) {
    let student = create_student();
    let target = create_result(1);

    c.bench_function("message_prompt", |b| {
        b.iter(|| message_prompt(black_box(&student), black_box("Coffee chat"), black_box(&target)));
    });
}

fn bench_schools_for(c: &mut Criterion) {
    let student = create_student();
    let additional: Vec<String> = ["Stanford", "UCLA", "usc", "", "Stanford"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    c.bench_function("schools_for", |b| {
        b.iter(|| schools_for(black_box(&student), true, black_box(&additional)));
    });
}

criterion_group!(
    benches,
    bench_merge_results,
    bench_parse_lines,
    bench_message_prompt,
    bench_schools_for
);

criterion_main!(benches);
