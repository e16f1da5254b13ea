mod admission_tests;
